/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::reader::DEFAULT_DELIMITER;

pub const DEFAULT_PERF_COUNTER_FILE: &str = "/var/lib/AzureEnhancedMonitor/PerfCounters";

/// Default number of records a snapshot can hold.
pub const PERF_COUNT_MAX: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    path: PathBuf,
    delimiter: u8,
    max_records: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::with_path(PathBuf::from(DEFAULT_PERF_COUNTER_FILE))
    }
}

impl StoreConfig {
    pub fn with_path(path: PathBuf) -> Self {
        StoreConfig {
            path,
            delimiter: DEFAULT_DELIMITER,
            max_records: PERF_COUNT_MAX,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    #[inline]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Set the field delimiter.
    ///
    /// It must be an ASCII byte that can not start or continue a numeral, and
    /// it can not be a line end.
    pub fn set_delimiter(&mut self, delimiter: u8) -> anyhow::Result<()> {
        if !delimiter.is_ascii()
            || delimiter.is_ascii_alphanumeric()
            || matches!(delimiter, 0 | b'\n' | b'\r' | b'+' | b'-' | b'.')
        {
            return Err(anyhow!("unsupported delimiter {:?}", delimiter as char));
        }
        self.delimiter = delimiter;
        Ok(())
    }

    #[inline]
    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn set_max_records(&mut self, max: usize) -> anyhow::Result<()> {
        if max == 0 || max > u16::MAX as usize {
            return Err(anyhow!("max records {max} out of range"));
        }
        self.max_records = max;
        Ok(())
    }
}

#[cfg(feature = "yaml")]
mod yaml {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, anyhow};
    use yaml_rust::{Yaml, YamlLoader, yaml};

    use super::StoreConfig;

    const ROOT_KEY: &str = "perf_counter";

    fn normalize_key(raw: &str) -> String {
        raw.to_lowercase().replace('-', "_")
    }

    fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
    where
        F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
    {
        for (k, v) in table.iter() {
            if let Yaml::String(key) = k {
                f(key, v).context(format!("failed to parse value of key {key}"))?;
            } else {
                return Err(anyhow!("key in hash should be string"));
            }
        }
        Ok(())
    }

    fn as_path(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
        let Yaml::String(s) = v else {
            return Err(anyhow!("yaml value type for path should be string"));
        };
        let path = PathBuf::from(s);
        if path.is_absolute() {
            return Ok(path);
        }
        match lookup_dir {
            Some(dir) => Ok(dir.join(path)),
            None => Err(anyhow!(
                "invalid value: {} is not an absolute path",
                path.display()
            )),
        }
    }

    fn as_delimiter(v: &Yaml) -> anyhow::Result<u8> {
        match v {
            Yaml::String(s) => match s.as_bytes() {
                [b] => Ok(*b),
                b"\\t" => Ok(b'\t'),
                _ => Err(anyhow!("delimiter should be a single ascii char")),
            },
            Yaml::Integer(i) => Ok(u8::try_from(*i)?),
            _ => Err(anyhow!(
                "yaml value type for 'delimiter' should be 'string' or 'integer'"
            )),
        }
    }

    fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
        match v {
            Yaml::String(s) => Ok(s.parse::<usize>()?),
            Yaml::Integer(i) => Ok(usize::try_from(*i)?),
            _ => Err(anyhow!(
                "yaml value type for 'usize' should be 'string' or 'integer'"
            )),
        }
    }

    impl StoreConfig {
        /// Parse the store config from a yaml map, or from a single path string.
        ///
        /// Relative paths are resolved against `lookup_dir`.
        pub fn parse_yaml(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
            match v {
                Yaml::Hash(map) => {
                    let mut config = StoreConfig::default();
                    foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v, lookup_dir))?;
                    Ok(config)
                }
                Yaml::String(_) => {
                    let path = as_path(v, lookup_dir)?;
                    Ok(StoreConfig::with_path(path))
                }
                _ => Err(anyhow!("invalid yaml value type for perf counter config")),
            }
        }

        fn set_by_yaml_kv(
            &mut self,
            k: &str,
            v: &Yaml,
            lookup_dir: Option<&Path>,
        ) -> anyhow::Result<()> {
            match normalize_key(k).as_str() {
                "path" | "file" => {
                    self.path = as_path(v, lookup_dir)?;
                    Ok(())
                }
                "delimiter" => {
                    let delimiter = as_delimiter(v)?;
                    self.set_delimiter(delimiter)
                }
                "max_records" => {
                    let max = as_usize(v)?;
                    self.set_max_records(max)
                }
                _ => Err(anyhow!("invalid key {k}")),
            }
        }

        /// Load the config from the first document of a yaml file.
        ///
        /// The `perf_counter` map is used if found, the document root otherwise.
        pub fn load_yaml_file(file: &Path) -> anyhow::Result<Self> {
            let content = std::fs::read_to_string(file)
                .map_err(|e| anyhow!("failed to read file {}: {e}", file.display()))?;
            let docs = YamlLoader::load_from_str(&content)
                .map_err(|e| anyhow!("invalid yaml file {}: {e}", file.display()))?;
            let Some(doc) = docs.first() else {
                return Err(anyhow!("no yaml doc found in file {}", file.display()));
            };
            let lookup_dir = file.parent();

            if let Yaml::Hash(map) = doc {
                let key = Yaml::String(ROOT_KEY.to_string());
                if let Some(v) = map.get(&key) {
                    return StoreConfig::parse_yaml(v, lookup_dir)
                        .context(format!("invalid value for key {ROOT_KEY}"));
                }
            }
            StoreConfig::parse_yaml(doc, lookup_dir)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;

        fn yaml_doc(s: &str) -> Yaml {
            YamlLoader::load_from_str(s).unwrap().remove(0)
        }

        #[test]
        fn parse_map() {
            let doc = yaml_doc("path: PerfCounters\ndelimiter: '|'\nmax-records: 16\n");
            let config = StoreConfig::parse_yaml(&doc, Some(Path::new("/etc/g3"))).unwrap();
            assert_eq!(config.path(), Path::new("/etc/g3/PerfCounters"));
            assert_eq!(config.delimiter(), b'|');
            assert_eq!(config.max_records(), 16);

            let doc = yaml_doc("file: /tmp/counters\ndelimiter: 59\n");
            let config = StoreConfig::parse_yaml(&doc, None).unwrap();
            assert_eq!(config.path(), Path::new("/tmp/counters"));
            assert_eq!(config.delimiter(), b';');
        }

        #[test]
        fn parse_path_only() {
            let doc = yaml_doc("/tmp/counters");
            let config = StoreConfig::parse_yaml(&doc, None).unwrap();
            assert_eq!(config.path(), Path::new("/tmp/counters"));
            assert_eq!(config.max_records(), super::super::PERF_COUNT_MAX);

            let doc = yaml_doc("counters");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());
        }

        #[test]
        fn parse_invalid() {
            let doc = yaml_doc("delimiter: ab\n");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());

            let doc = yaml_doc("delimiter: '1'\n");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());

            let doc = yaml_doc("max_records: 0\n");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());

            let doc = yaml_doc("unknown: 1\n");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());

            let doc = yaml_doc("- a\n- b\n");
            assert!(StoreConfig::parse_yaml(&doc, None).is_err());
        }

        #[test]
        fn load_file() {
            let dir = tempfile::tempdir().unwrap();
            let conf = dir.path().join("perfc.yaml");
            let mut f = std::fs::File::create(&conf).unwrap();
            f.write_all(b"perf_counter:\n  path: data/PerfCounters\n")
                .unwrap();
            drop(f);

            let config = StoreConfig::load_yaml_file(&conf).unwrap();
            assert_eq!(config.path(), dir.path().join("data/PerfCounters"));
        }
    }
}
