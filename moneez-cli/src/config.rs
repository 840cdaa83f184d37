use anyhow::{Context, Result};
use moneez_core::CategoryMaps;
use moneez_ingest::{FieldProcessor, InputSource, expand_home};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// The JSON config document
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "category colors", default, deserialize_with = "ordered_pairs")]
    pub category_colors: Vec<(String, String)>,

    #[serde(default, deserialize_with = "ordered_pairs")]
    pub ibans: Vec<(String, String)>,

    /// Order matters: the first matching keyword wins
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub keywords: Vec<(String, String)>,

    #[serde(rename = "default color")]
    pub default_color: Option<String>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(rename = "input files")]
    pub input_files: Vec<InputFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputFile {
    pub file: String,
    pub columns: Option<String>,
    pub rows: Option<String>,
    #[serde(rename = "field processor")]
    pub field_processor: Option<String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Read a JSON object into (key, value) pairs, keeping document order.
/// A repeated key keeps its first position and takes its last value.
fn ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of string values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs: Vec<(String, String)> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((k, v)) = map.next_entry::<String, String>()? {
                match pairs.iter_mut().find(|slot| slot.0 == k) {
                    Some(slot) => slot.1 = v,
                    None => pairs.push((k, v)),
                }
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parse config")
    }

    pub fn category_maps(&self) -> CategoryMaps {
        CategoryMaps::new()
            .with_ibans(self.ibans.iter().cloned())
            .with_keywords(self.keywords.iter().cloned())
            .with_colors(self.category_colors.iter().cloned())
    }

    /// Resolve every input file. Unknown field processors fail here, before
    /// anything is read.
    pub fn input_sources(&self) -> Result<Vec<InputSource>> {
        self.input_files.iter().map(InputFile::to_source).collect()
    }
}

impl InputFile {
    fn to_source(&self) -> Result<InputSource> {
        let path = expand_home(&self.file)?;
        let processor = match &self.field_processor {
            Some(name) => name.parse::<FieldProcessor>()?,
            None => FieldProcessor::default(),
        };
        InputSource::new(path)
            .with_processor(processor)
            .with_separators(
                self.columns.as_deref().unwrap_or(";"),
                self.rows.as_deref().unwrap_or("\n"),
            )
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Config::from_json(&s).with_context(|| format!("in {}", path.display()))
}
