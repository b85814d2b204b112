//! Class lists: loading, digit-key resolution and `data.yaml` output.
//!
//! A class list is either a plain text file of whitespace-separated names
//! (list order is the class index) or an Ultralytics-style `data.yaml` whose
//! `names` are a sequence or an index mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RegionlabError;

/// Digit keys can only address the first ten classes.
pub const MAX_DIGIT_CLASSES: usize = 10;

/// A resolved class: index into the list plus its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassRef {
    pub index: usize,
    pub name: String,
}

impl ClassRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// The ordered class names for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    /// Builds a class list from names. Fails if the list is empty or a name
    /// contains whitespace (it would break the corner-record line format).
    pub fn new(names: Vec<String>, source: &Path) -> Result<Self, RegionlabError> {
        if names.is_empty() {
            return Err(RegionlabError::ClassListInvalid {
                path: source.to_path_buf(),
                message: "no class names found".to_string(),
            });
        }

        if let Some((index, name)) = names
            .iter()
            .enumerate()
            .find(|(_, name)| name.is_empty() || name.chars().any(char::is_whitespace))
        {
            return Err(RegionlabError::ClassListInvalid {
                path: source.to_path_buf(),
                message: format!("class {} name '{}' is empty or contains whitespace", index, name),
            });
        }

        Ok(Self { names })
    }

    /// Loads a class list, dispatching on the file extension.
    pub fn load(path: &Path) -> Result<Self, RegionlabError> {
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let data = fs::read_to_string(path).map_err(|source| RegionlabError::ClassListInvalid {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

        let names = if is_yaml {
            parse_data_yaml_names(&data, path)?
        } else {
            data.split_whitespace().map(str::to_string).collect()
        };

        Self::new(names, path)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<ClassRef> {
        self.name(index).map(|name| ClassRef::new(index, name))
    }

    /// The first class; sessions start with it selected.
    pub fn first(&self) -> ClassRef {
        ClassRef::new(0, self.names[0].clone())
    }

    /// Resolves a digit key to a class.
    ///
    /// Returns `None` for digits above 9 and for digits at or beyond the
    /// number of loaded classes.
    pub fn resolve_digit(&self, digit: u8) -> Option<ClassRef> {
        let index = digit as usize;
        if index >= MAX_DIGIT_CLASSES {
            return None;
        }
        self.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Writes a `data.yaml` naming the classes by index.
    pub fn write_data_yaml(&self, path: &Path) -> Result<(), RegionlabError> {
        let mut yaml = String::from("names:\n");
        for (idx, name) in self.names.iter().enumerate() {
            yaml.push_str(&format!("  {}: {}\n", idx, yaml_single_quoted(name)));
        }

        fs::write(path, yaml).map_err(|source| RegionlabError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Legend shown to the operator: one `(i) :name` line per class.
impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Classes (press number to select):")?;
        for (idx, name) in self.names.iter().enumerate() {
            if idx < MAX_DIGIT_CLASSES {
                writeln!(f, "({}) :{}", idx, name)?;
            } else {
                writeln!(f, "( ) :{} (no key)", name)?;
            }
        }
        Ok(())
    }
}

/// Largest class list an index-keyed `names` map may expand to.
const MAX_CLASS_MAP_LEN: usize = 65_536;

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

fn parse_data_yaml_names(data: &str, path: &Path) -> Result<Vec<String>, RegionlabError> {
    let parsed: DataYaml =
        serde_yaml::from_str(data).map_err(|source| RegionlabError::ClassMapYamlParse {
            path: PathBuf::from(path),
            source,
        })?;

    let names = match parsed.names {
        DataYamlNames::Sequence(names) => names,
        DataYamlNames::Mapping(mapping) => {
            let Some(max_index) = mapping.keys().max().copied() else {
                return Ok(Vec::new());
            };
            let Some(len) = max_index.checked_add(1).filter(|len| *len <= MAX_CLASS_MAP_LEN)
            else {
                return Err(RegionlabError::ClassListInvalid {
                    path: PathBuf::from(path),
                    message: format!(
                        "class index {} exceeds the limit of {} classes",
                        max_index, MAX_CLASS_MAP_LEN
                    ),
                });
            };
            let mut names = vec![String::new(); len];
            for (index, name) in mapping {
                names[index] = name;
            }
            for (index, name) in names.iter_mut().enumerate() {
                if name.trim().is_empty() {
                    *name = format!("class_{}", index);
                }
            }
            names
        }
    };

    Ok(names)
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
