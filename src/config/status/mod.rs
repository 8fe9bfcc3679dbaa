use anyhow::Context;
use const_format::concatcp;
use derivative::Derivative;
use lazy_static::lazy_static;

use super::*;
use crate::errors::HealStatusError;

pub const STORAGE_CLASS: &str = "storage_class";
pub const STANDARD_PARITY: &str = storageclass::CLASS_STANDARD;
pub const RRS_PARITY: &str = storageclass::CLASS_RRS;
pub const JSON: &str = "json";
pub const VERBOSE: &str = "verbose";
pub const COLOR: &str = "color";

pub const ENV_STORAGE_CLASS: &str = concatcp!(ENV_PREFIX, "STORAGE_CLASS");
pub const ENV_STANDARD_PARITY: &str = concatcp!(ENV_PREFIX, "STORAGE_CLASS_STANDARD");
pub const ENV_RRS_PARITY: &str = concatcp!(ENV_PREFIX, "STORAGE_CLASS_RRS");
pub const ENV_JSON: &str = concatcp!(ENV_PREFIX, "JSON");
pub const ENV_VERBOSE: &str = concatcp!(ENV_PREFIX, "VERBOSE");
pub const ENV_COLOR: &str = concatcp!(ENV_PREFIX, "COLOR");

lazy_static! {
    pub static ref DEFAULT_KVS: KVS = KVS(vec![
        KV {
            key: STORAGE_CLASS.to_owned(),
            value: "".to_owned(),
        },
        KV {
            key: STANDARD_PARITY.to_owned(),
            value: "".to_owned(),
        },
        KV {
            key: RRS_PARITY.to_owned(),
            value: "".to_owned(),
        },
        KV {
            key: JSON.to_owned(),
            value: ENABLE_OFF.to_owned(),
        },
        KV {
            key: VERBOSE.to_owned(),
            value: ENABLE_OFF.to_owned(),
        },
        KV {
            key: COLOR.to_owned(),
            value: ENABLE_ON.to_owned(),
        },
    ]);
}

#[derive(Derivative, Debug, Clone, PartialEq)]
#[derivative(Default)]
pub struct Config {
    // Normalized storage class to compute server tolerance for, if any.
    pub storage_class: Option<String>,
    // Parity overrides taking precedence over the snapshot's parity map.
    pub standard_parity: Option<usize>,
    pub rrs_parity: Option<usize>,
    pub json: bool,
    pub verbose: bool,
    #[derivative(Default(value = "true"))]
    pub color: bool,
}

pub fn lookup_config(kvs: &KVS) -> anyhow::Result<Config> {
    lookup_config_with_env(kvs, |key| std::env::var(key).ok())
}

// Resolves each key from the environment first, then `kvs`, then the defaults.
pub fn lookup_config_with_env<F>(kvs: &KVS, env: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    check_valid_keys(HEAL_STATUS_SUB_SYS, kvs, &DEFAULT_KVS)?;
    let kvs = kvs.merge_defaults(&DEFAULT_KVS);
    let value = |env_key: &str, key: &str| env(env_key).unwrap_or_else(|| kvs.get(key).to_owned());

    let storage_class = value(ENV_STORAGE_CLASS, STORAGE_CLASS);
    let storage_class = if storage_class.trim().is_empty() {
        None
    } else {
        Some(storageclass::normalize_name(&storage_class))
    };

    let parity = |env_key: &str, key: &str| -> anyhow::Result<Option<usize>> {
        let v = value(env_key, key);
        if v.trim().is_empty() {
            return Ok(None);
        }
        let parity = storageclass::parse_parity(&v)
            .with_context(|| format!("heal status '{}' value invalid", key))?;
        Ok(Some(parity))
    };
    let standard_parity = parity(ENV_STANDARD_PARITY, STANDARD_PARITY)?;
    let rrs_parity = parity(ENV_RRS_PARITY, RRS_PARITY)?;

    let flag = |env_key: &str, key: &str| -> anyhow::Result<bool> {
        let v = value(env_key, key);
        crate::utils::parse_bool_ext(&v).map_err(|_| {
            anyhow::Error::new(HealStatusError::InvalidConfigValue {
                key: key.to_owned(),
                value: v.clone(),
            })
        })
    };

    Ok(Config {
        storage_class,
        standard_parity,
        rrs_parity,
        json: flag(ENV_JSON, JSON)?,
        verbose: flag(ENV_VERBOSE, VERBOSE)?,
        color: flag(ENV_COLOR, COLOR)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use maplit::hashmap;

    use super::*;
    use crate::errors::AsError;

    fn env_of(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_lookup_config_defaults() {
        let config = lookup_config_with_env(&KVS::default(), env_of(HashMap::new())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_lookup_config_kvs_and_env() {
        let kvs = KVS::parse(
            "storage_class=rrs standard=EC:4 json=on",
            &DEFAULT_KVS.keys(),
        )
        .unwrap();
        let env = env_of(hashmap! {
            ENV_JSON => "off",
            ENV_VERBOSE => "enabled",
            ENV_RRS_PARITY => "2",
        });
        let config = lookup_config_with_env(&kvs, env).unwrap();
        assert_eq!(config.storage_class.as_deref(), Some(storageclass::RRS));
        assert_eq!(config.standard_parity, Some(4));
        assert_eq!(config.rrs_parity, Some(2));
        assert!(!config.json);
        assert!(config.verbose);
        assert!(config.color);
    }

    #[test]
    fn test_lookup_config_any_storage_class() {
        let env = env_of(hashmap! { ENV_STORAGE_CLASS => "glacier" });
        let config = lookup_config_with_env(&KVS::default(), env).unwrap();
        assert_eq!(config.storage_class.as_deref(), Some("GLACIER"));

        let env = env_of(hashmap! { ENV_STORAGE_CLASS => "  " });
        let config = lookup_config_with_env(&KVS::default(), env).unwrap();
        assert_eq!(config.storage_class, None);
    }

    #[test]
    fn test_lookup_config_invalid() {
        let env = env_of(hashmap! { ENV_COLOR => "maybe" });
        let err = lookup_config_with_env(&KVS::default(), env).unwrap_err();
        assert!(matches!(
            err.as_error::<HealStatusError>(),
            Some(HealStatusError::InvalidConfigValue { .. })
        ));

        let env = env_of(hashmap! { ENV_STANDARD_PARITY => "EC:x" });
        let err = lookup_config_with_env(&KVS::default(), env).unwrap_err();
        assert!(matches!(
            err.as_error::<HealStatusError>(),
            Some(HealStatusError::InvalidParity(_))
        ));
    }
}
