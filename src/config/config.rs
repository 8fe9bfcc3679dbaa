use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::errors::HealStatusError;

pub const ENABLE_ON: &str = "on";
pub const ENABLE_OFF: &str = "off";
pub const COMMON_KEY: &str = "comment";

// Top level config constants.
pub const HEAL_STATUS_SUB_SYS: &str = "heal_status";
// Add new constants here if you add new fields to config.

// Constant separators
pub const KV_SEPARATOR: &str = "=";
pub const KV_SPACE_SEPARATOR: &str = " ";
pub const KV_DOUBLE_QUOTE: &str = "\"";
pub const KV_SINGLE_QUOTE: &str = "'";

// Env prefix used for all envs in healstat
pub const ENV_PREFIX: &str = "HEALSTAT_";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KV {
    pub key: String,
    pub value: String,
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct KVS(pub Vec<KV>);

impl KVS {
    /// Parses `key=value` pairs separated by whitespace. Only `keys` are
    /// recognized as field starts, so values may contain spaces.
    pub fn parse(input: &str, keys: &[&str]) -> anyhow::Result<KVS> {
        let mut kvs = KVS::default();
        let mut prev_k = ""; // previous key
        for f in kv_fields(input, keys) {
            let kv: Vec<&str> = f.splitn(2, KV_SEPARATOR).collect();
            if kv.is_empty() {
                continue;
            } else if kv.len() == 1 && !prev_k.is_empty() {
                // Merge previous value and this value.
                let v = [kvs.get(prev_k), sanitize_value(kv[0])].join(KV_SPACE_SEPARATOR);
                kvs.set(prev_k.to_owned(), v);
            } else if kv.len() == 2 {
                prev_k = kv[0];
                kvs.set(prev_k.to_owned(), sanitize_value(kv[1]).to_owned());
            } else {
                bail!("key '{}' must have value", kv[0]);
            }
        }
        if kvs.is_empty() && !input.trim().is_empty() {
            bail!("no known keys found in '{}'", input);
        }
        Ok(kvs)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KV> {
        self.0.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.iter().map(|kv| kv.key.as_str()).collect();
        // Comment Key not found, add it explicitly.
        if !keys.contains(&COMMON_KEY) {
            keys.push(COMMON_KEY);
        }
        keys
    }

    // Sets a key value pair.
    pub fn set(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => {
                kv.value = value;
            }
            None => self.0.push(KV { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.lookup(key).unwrap_or("")
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|&kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Returns a copy of `self` where every key missing from `self` takes
    /// its value from `defaults`.
    pub fn merge_defaults(&self, defaults: &KVS) -> KVS {
        let mut merged = self.clone();
        for kv in defaults.iter() {
            if merged.lookup(&kv.key).is_none() {
                merged.set(kv.key.to_owned(), kv.value.to_owned());
            }
        }
        merged
    }
}

impl ToString for KVS {
    fn to_string(&self) -> String {
        let mut s = String::new();
        for kv in &self.0 {
            s.push_str(&kv.key);
            s.push_str(KV_SEPARATOR);
            let spc = kv.value.contains(char::is_whitespace);
            if spc {
                s.push_str(KV_DOUBLE_QUOTE);
            }
            s.push_str(&kv.value);
            if spc {
                s.push_str(KV_DOUBLE_QUOTE);
            }
            s.push_str(KV_SPACE_SEPARATOR);
        }
        s.trim_end().to_owned()
    }
}

// Rejects keys of `kvs` that the sub-system does not know about.
pub fn check_valid_keys(sub_sys: &str, kvs: &KVS, valid_kvs: &KVS) -> anyhow::Result<()> {
    let valid_keys = valid_kvs.keys();
    let unknown: Vec<&str> = kvs
        .iter()
        .map(|kv| kv.key.as_str())
        .filter(|key| !valid_keys.contains(key))
        .collect();
    if !unknown.is_empty() {
        return Err(anyhow::Error::new(HealStatusError::InvalidConfigKey(
            unknown.join(","),
        ))
        .context(format!("found invalid keys for '{}' sub-system", sub_sys)));
    }
    Ok(())
}

pub fn kv_fields<'a>(input: &'a str, keys: &[&str]) -> Vec<&'a str> {
    let mut value_indexes: Vec<usize> = Vec::with_capacity(keys.len());
    for key in keys {
        let pattern = (*key).to_owned() + KV_SEPARATOR;
        let found = input.match_indices(&pattern).find(|(i, _)| {
            // Only match at the start of a field.
            *i == 0 || input[..*i].ends_with(char::is_whitespace)
        });
        if let Some((i, _)) = found {
            value_indexes.push(i);
        }
    }

    value_indexes.sort_unstable();
    value_indexes
        .iter()
        .enumerate()
        .map(|(i, index)| {
            let end = value_indexes.get(i + 1).copied().unwrap_or_else(|| input.len());
            input[*index..end].trim()
        })
        .collect()
}

// Trim off whitespaces, single or double quotes, creeping into the values.
fn sanitize_value(v: &str) -> &str {
    let quotes = KV_DOUBLE_QUOTE
        .chars()
        .chain(KV_SINGLE_QUOTE.chars())
        .collect::<Vec<char>>();
    v.trim().trim_matches(&quotes[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AsError;

    #[test]
    fn test_kv_fields() {
        let keys = ["storage_class", "json", "comment"];
        let cases: [(&str, Vec<&str>); 4] = [
            ("", vec![]),
            ("json=on", vec!["json=on"]),
            (
                "storage_class=STANDARD json=off",
                vec!["storage_class=STANDARD", "json=off"],
            ),
            (
                "comment=\"some notes here\" json=on",
                vec!["comment=\"some notes here\"", "json=on"],
            ),
        ];
        for (input, expected) in cases.iter() {
            assert_eq!(kv_fields(input, &keys), *expected);
        }
    }

    #[test]
    fn test_kvs_parse() {
        let keys = ["storage_class", "json", "comment"];
        let kvs = KVS::parse("storage_class='rrs' comment=two words", &keys).unwrap();
        assert_eq!(kvs.get("storage_class"), "rrs");
        assert_eq!(kvs.get("comment"), "two words");
        assert_eq!(kvs.lookup("json"), None);

        assert!(KVS::parse("verbose=on", &keys).is_err());
        assert!(KVS::parse("", &keys).unwrap().is_empty());
    }

    #[test]
    fn test_check_valid_keys() {
        let valid = KVS(vec![KV {
            key: "json".to_owned(),
            value: ENABLE_OFF.to_owned(),
        }]);
        let mut kvs = KVS::default();
        kvs.set("json".to_owned(), ENABLE_ON.to_owned());
        kvs.set(COMMON_KEY.to_owned(), "note".to_owned());
        assert!(check_valid_keys(HEAL_STATUS_SUB_SYS, &kvs, &valid).is_ok());

        kvs.set("unknown".to_owned(), "1".to_owned());
        let err = check_valid_keys(HEAL_STATUS_SUB_SYS, &kvs, &valid).unwrap_err();
        assert!(matches!(
            err.as_error::<HealStatusError>(),
            Some(HealStatusError::InvalidConfigKey(k)) if k == "unknown"
        ));
    }

    #[test]
    fn test_merge_defaults_and_to_string() {
        let defaults = KVS(vec![
            KV {
                key: "json".to_owned(),
                value: ENABLE_OFF.to_owned(),
            },
            KV {
                key: "comment".to_owned(),
                value: "".to_owned(),
            },
        ]);
        let mut kvs = KVS::default();
        kvs.set("comment".to_owned(), "a b".to_owned());
        let merged = kvs.merge_defaults(&defaults);
        assert_eq!(merged.get("json"), ENABLE_OFF);
        assert_eq!(merged.to_string(), "comment=\"a b\" json=off");
    }
}
