//! Shared fixtures for integration tests.
//!
//! Builds the same logical objects either as an unpacked container or as
//! an intermediate tree, on disk under a temporary directory.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use cfxml::core::record::parse_str;
use cfxml::core::types::{MetadataKind, KNOWN_INCLUDE_GROUPS};

pub const HEADER_FILE: &str = "hdr0000";

pub const FORM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Form xmlns="http://v8.1c.ru/8.3/xcf/logform" version="2.20">
	<AutoTitle>false</AutoTitle>
</Form>"#;

/// Header section: `{1,{0,0,id},"name",{1,"ru","name ru"},"",tail...}`.
pub fn header_section(id: &str, name: &str, tail: &[&str]) -> String {
    let mut section = format!("{{1,{{0,0,{id}}},\"{name}\",{{1,\"ru\",\"{name} ru\"}},\"\"");
    for item in tail {
        section.push(',');
        section.push_str(item);
    }
    section.push('}');
    section
}

/// `{kind, count, entry...}`
pub fn typed_section(kind: &str, entries: &[String]) -> String {
    let mut section = format!("{{{kind},{}", entries.len());
    for entry in entries {
        section.push(',');
        section.push_str(entry);
    }
    section.push('}');
    section
}

pub fn full_attribute(id: &str, name: &str, pattern: &str) -> String {
    let props = format!("{{0,{{0,0,{id}}},\"{name}\",{{\"1\",\"ru\",\"{name}\"}},\"\",0,0,0,0}}");
    format!("{{{{0,{{0,{{0,{props},{{\"Pattern\",{{{pattern}}}}}}},0,0,{{0}}}}}}}}")
}

pub fn override_attribute(id: &str, name: &str, link: &str, type_id: &str) -> String {
    let props = format!("{{0,{{0,0,{id}}},\"{name}\",{{0}},\"\",0,0,0,0,0,0,{link}}}");
    format!("{{{{0,{{0,{{0,{props},{{\"Pattern\",{{\"#\",{type_id}}}}}}},0,0,{{0}}}}}}}}")
}

/// A catalog record description.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    /// First hex digit of every generated-type id, to keep catalogs apart.
    pub generated_prefix: char,
    pub attributes: Vec<String>,
    pub commands: Vec<String>,
    pub forms: Vec<String>,
}

impl Catalog {
    pub fn new(id: &str, name: &str, generated_prefix: char) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            generated_prefix,
            attributes: Vec::new(),
            commands: Vec::new(),
            forms: Vec::new(),
        }
    }

    pub fn generated_id(&self, slot: usize) -> String {
        format!("{}{slot:07}-0000-0000-0000-000000000000", self.generated_prefix)
    }

    /// Type id the registry records for this catalog.
    pub fn type_id(&self) -> String {
        self.generated_id(3)
    }

    pub fn render(&self) -> String {
        let section = header_section(&self.id, &self.name, &["0", "0", "0", "0"]);
        let mut body: Vec<String> = vec!["0".to_string(); 36];
        for slot in (1..=8).chain([34, 35]) {
            body[slot] = self.generated_id(slot);
        }
        body[9] = format!("{{0,{section}}}");
        body[10] = "2".into();
        body[11] = "9".into();
        body[19] = "25".into();

        format!(
            "{{1,{{{}}},4,{},{},{{aaaaaaaa-0000-0000-0000-000000000000,0}},{}}}",
            body.join(","),
            typed_section(MetadataKind::CatalogForm.type_id(), &self.forms),
            typed_section(MetadataKind::CatalogCommand.type_id(), &self.commands),
            typed_section("bbbbbbbb-0000-0000-0000-000000000000", &self.attributes),
        )
    }
}

pub fn command_text(id: &str, name: &str) -> String {
    format!("{{1,{{1,{}}}}}", header_section(id, name, &[]))
}

pub fn form_text(id: &str, name: &str) -> String {
    format!("{{1,{{1,{{0,{},0,1}}}}}}", header_section(id, name, &[]))
}

/// Common module with the server and server-call flags set.
pub fn common_module_text(id: &str, name: &str) -> String {
    format!("{{1,{{1,{},0,1,0,0,0,0,0,1}}}}", header_section(id, name, &[]))
}

/// An unpacked container on disk.
pub struct ContainerFixture {
    pub dir: TempDir,
    objects: Vec<(MetadataKind, String)>,
}

impl ContainerFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            objects: Vec::new(),
        }
    }

    /// Add a top-level object file listed in the header.
    pub fn object(&mut self, kind: MetadataKind, file: &str, text: &str) -> &mut Self {
        self.objects.push((kind, file.to_string()));
        self.file(file, text)
    }

    /// Add any file under the container root.
    pub fn file(&mut self, path: &str, text: &str) -> &mut Self {
        self.dir.child(path).write_str(text).unwrap();
        self
    }

    /// Write the root descriptor and header file.
    pub fn finish(&mut self) -> &Path {
        let mut sections: Vec<(MetadataKind, Vec<String>)> = Vec::new();
        for (kind, file) in &self.objects {
            match sections.iter_mut().find(|(k, _)| k == kind) {
                Some((_, files)) => files.push(file.clone()),
                None => sections.push((*kind, vec![file.clone()])),
            }
        }
        let rendered: Vec<String> = sections
            .iter()
            .map(|(kind, files)| typed_section(kind.type_id(), files))
            .collect();
        let block = format!("{{0,0,{},{}}}", rendered.len(), rendered.join(","));

        self.dir
            .child("root")
            .write_str(&format!("{{2,{HEADER_FILE},\"\"}}"))
            .unwrap();
        self.dir
            .child(HEADER_FILE)
            .write_str(&format!(
                "{{0,0,1,{{{},{{6,{block}}}}}}}",
                KNOWN_INCLUDE_GROUPS[0]
            ))
            .unwrap();
        self.dir.path()
    }
}

/// An intermediate tree on disk.
pub struct IntermediateFixture {
    pub dir: TempDir,
}

impl IntermediateFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `<dir>/<Kind>.json` and `<Kind>.id.json` for a record text.
    pub fn object(&self, dir: &str, kind: MetadataKind, id: &str, name: &str, text: &str) -> &Self {
        let record = parse_str(text).unwrap();
        let header = serde_json::json!({
            "name": name,
            "name2": { "ru": format!("{name} ru") },
            "comment": "",
            "header": record,
        });
        let kind = kind.as_str();
        self.file(&format!("{dir}/{kind}.json"), &header.to_string());
        self.file(
            &format!("{dir}/{kind}.id.json"),
            &serde_json::json!({ "uuid": id }).to_string(),
        )
    }

    pub fn file(&self, path: &str, text: &str) -> &Self {
        self.dir.child(path).write_str(text).unwrap();
        self
    }
}

/// Every file under `root`, keyed by relative path.
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            files.insert(relative, fs::read(&path).unwrap());
        }
    }
}

/// File contents as text, BOM stripped.
pub fn text(files: &BTreeMap<String, Vec<u8>>, path: &str) -> String {
    let bytes = files
        .get(path)
        .unwrap_or_else(|| panic!("missing {path}; have {:?}", files.keys().collect::<Vec<_>>()));
    String::from_utf8(bytes.clone())
        .unwrap()
        .trim_start_matches('\u{FEFF}')
        .to_string()
}
