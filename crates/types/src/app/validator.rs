// Path: crates/types/src/app/validator.rs

use crate::error::ValidatorSetError;
use crate::hash::{merkle_root, sha256, Hash};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A 20-byte validator address, derived from the validator's public key.
#[derive(
    Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct Address(pub [u8; 20]);

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A validator's consensus public key. The key scheme is opaque to the core.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
pub struct PubKey(pub Vec<u8>);

impl PubKey {
    /// The address is the first 20 bytes of the SHA-256 of the raw key bytes.
    pub fn address(&self) -> Address {
        let digest = sha256(&self.0);
        let mut out = [0u8; 20];
        out.copy_from_slice(digest.get(..20).unwrap_or(&[0u8; 20]));
        Address(out)
    }
}

impl std::fmt::Debug for PubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PubKey({})", hex::encode(&self.0))
    }
}

/// A single member of a validator set.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    pub address: Address,
    pub pub_key: PubKey,
    pub voting_power: i64,
    /// Proposer-selection accumulator.
    pub accum: i64,
}

impl Validator {
    pub fn new(pub_key: PubKey, voting_power: i64) -> Self {
        Self {
            address: pub_key.address(),
            pub_key,
            voting_power,
            accum: 0,
        }
    }
}

/// A change to the validator set requested by the application at end of block.
///
/// A power of zero removes the validator; an unknown key with positive power adds it.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorUpdate {
    pub pub_key: PubKey,
    pub power: i64,
}

/// An ordered, weighted collection of validators.
///
/// Validators are kept sorted by address, which makes every iteration order and
/// therefore every derived value (accumulators, proposer, hash) deterministic.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    proposer: Option<Validator>,
}

impl ValidatorSet {
    /// Builds a validator set and selects its first proposer.
    pub fn new(mut validators: Vec<Validator>) -> Result<Self, ValidatorSetError> {
        validators.sort_by(|a, b| a.address.cmp(&b.address));
        let mut seen = BTreeSet::new();
        for v in &validators {
            if v.voting_power < 0 {
                return Err(ValidatorSetError::NegativePower {
                    address: v.address,
                    power: v.voting_power,
                });
            }
            if !seen.insert(v.address) {
                return Err(ValidatorSetError::DuplicateValidator(v.address));
            }
        }
        let mut set = Self {
            validators,
            proposer: None,
        };
        set.increment_accum(1);
        Ok(set)
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// The proposer selected by the most recent accumulator increment.
    pub fn proposer(&self) -> Option<&Validator> {
        self.proposer.as_ref()
    }

    pub fn total_voting_power(&self) -> i64 {
        self.validators
            .iter()
            .fold(0i64, |acc, v| acc.saturating_add(v.voting_power))
    }

    pub fn get_by_address(&self, address: &Address) -> Option<&Validator> {
        self.validators
            .binary_search_by(|v| v.address.cmp(address))
            .ok()
            .and_then(|i| self.validators.get(i))
    }

    pub fn has_address(&self, address: &Address) -> bool {
        self.get_by_address(address).is_some()
    }

    /// The `(address, power)` pairs that define the set's composition.
    fn composition(&self) -> Vec<(Address, i64)> {
        self.validators
            .iter()
            .map(|v| (v.address, v.voting_power))
            .collect()
    }

    fn most_accum_index(&self) -> Option<usize> {
        self.validators
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.accum
                    .cmp(&b.accum)
                    .then_with(|| b.address.cmp(&a.address))
            })
            .map(|(i, _)| i)
    }

    /// Advances every accumulator by `times` units of voting power, then for each
    /// unit charges the validator with the highest accumulator the total voting power.
    ///
    /// Ties go to the lower address. The last charged validator becomes the proposer.
    pub fn increment_accum(&mut self, times: u32) {
        if self.validators.is_empty() || times == 0 {
            return;
        }
        let total = self.total_voting_power();
        let times = i64::from(times);
        for v in &mut self.validators {
            v.accum = v.accum.saturating_add(v.voting_power.saturating_mul(times));
        }

        let mut proposer_index = None;
        for _ in 0..times {
            let Some(index) = self.most_accum_index() else {
                break;
            };
            if let Some(v) = self.validators.get_mut(index) {
                v.accum = v.accum.saturating_sub(total);
            }
            proposer_index = Some(index);
        }
        self.proposer = proposer_index.and_then(|i| self.validators.get(i).cloned());
    }

    /// Applies end-of-block updates to this set.
    ///
    /// Returns `true` when the member list or any voting power changed. The update is
    /// all-or-nothing: on error the set is left exactly as it was.
    pub fn apply_updates(&mut self, updates: &[ValidatorUpdate]) -> Result<bool, ValidatorSetError> {
        let before = self.composition();
        let mut next = self.validators.clone();
        let mut seen = BTreeSet::new();

        for update in updates {
            let address = update.pub_key.address();
            if !seen.insert(address) {
                return Err(ValidatorSetError::DuplicateValidator(address));
            }
            if update.power < 0 {
                return Err(ValidatorSetError::NegativePower {
                    address,
                    power: update.power,
                });
            }
            match next.binary_search_by(|v| v.address.cmp(&address)) {
                Ok(index) if update.power == 0 => {
                    next.remove(index);
                }
                Ok(index) => {
                    if let Some(v) = next.get_mut(index) {
                        v.voting_power = update.power;
                    }
                }
                Err(_) if update.power == 0 => {
                    return Err(ValidatorSetError::RemoveUnknown(address));
                }
                Err(index) => {
                    next.insert(index, Validator::new(update.pub_key.clone(), update.power));
                }
            }
        }

        if next.is_empty() {
            return Err(ValidatorSetError::Empty);
        }

        self.validators = next;
        if let Some(p) = &self.proposer {
            if !self.has_address(&p.address) {
                self.proposer = None;
            }
        }
        Ok(before != self.composition())
    }

    /// Merkle root over each validator's canonical `(pub_key, voting_power)` encoding.
    pub fn hash(&self) -> Hash {
        let leaves: Vec<Vec<u8>> = self
            .validators
            .iter()
            .map(|v| (&v.pub_key, v.voting_power).encode())
            .collect();
        merkle_root(&leaves)
    }
}
