// Path: crates/types/src/app/genesis.rs

use crate::app::{AppHash, ChainId, ConsensusParams, PubKey};
use crate::error::GenesisError;
use serde::{Deserialize, Serialize};

/// A validator as listed in the genesis document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisValidator {
    /// Hex-encoded public key bytes.
    #[serde(with = "hex_bytes")]
    pub pub_key: Vec<u8>,
    pub power: i64,
    #[serde(default)]
    pub name: String,
}

impl GenesisValidator {
    pub fn pub_key(&self) -> PubKey {
        PubKey(self.pub_key.clone())
    }
}

/// The initial conditions of a chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenesisDoc {
    pub chain_id: ChainId,
    /// Genesis time in Unix milliseconds.
    pub genesis_time: u64,
    pub validators: Vec<GenesisValidator>,
    #[serde(default)]
    pub consensus_params: ConsensusParams,
    /// Hex-encoded initial application state root, if the application has one.
    #[serde(default, with = "hex_bytes_opt")]
    pub app_hash: Option<Vec<u8>>,
}

impl GenesisDoc {
    /// Parses a JSON genesis document and checks it for consistency.
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        let doc: GenesisDoc =
            serde_json::from_str(json).map_err(|e| GenesisError::Parse(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.chain_id.0.is_empty() {
            return Err(GenesisError::Invalid("chain_id must not be empty".into()));
        }
        if self.validators.is_empty() {
            return Err(GenesisError::Invalid("genesis has no validators".into()));
        }
        if let Some(v) = self.validators.iter().find(|v| v.power <= 0) {
            return Err(GenesisError::Invalid(format!(
                "genesis validator '{}' has non-positive power {}",
                v.name, v.power
            )));
        }
        self.consensus_params
            .validate()
            .map_err(|e| GenesisError::Invalid(e.to_string()))
    }

    pub fn app_hash(&self) -> Option<AppHash> {
        self.app_hash.clone().map(AppHash)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => s.serialize_some(&hex::encode(b)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let s = Option::<String>::deserialize(d)?;
        match s {
            Some(s) if !s.is_empty() => hex::decode(s).map(Some).map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
