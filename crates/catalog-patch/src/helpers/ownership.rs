use crate::accumulator::PatchAccumulator;
use crate::error::{PatchError, PatchResult};
use crate::op::{empty_marker, PatchOp, PatchOpKind};
use crate::records::{to_value, Owner, OwnershipType};

use super::ContainerPatchHelper;

pub const OWNERSHIP_ASPECT: &str = "ownership";

/// Owners are keyed by `(owner, type)`: one person can hold several
/// ownership types and each grant is patched separately.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipPatchHelper {
    owners: ContainerPatchHelper,
}

impl Default for OwnershipPatchHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipPatchHelper {
    pub const fn new() -> Self {
        Self {
            owners: ContainerPatchHelper::new(OWNERSHIP_ASPECT, "owners"),
        }
    }

    /// `add /owners/<owner>/<type>`
    pub fn add_owner(&self, acc: &mut PatchAccumulator, owner: &Owner) -> PatchResult<()> {
        let path = self
            .owners
            .entry_path(&owner.owner)?
            .key(owner.owner_type.as_str());
        acc.push(PatchOp::new(
            OWNERSHIP_ASPECT,
            PatchOpKind::Add,
            path,
            to_value(owner)?,
        )?);
        Ok(())
    }

    /// Without a type every grant held by `owner` goes; with one, only that grant.
    pub fn remove_owner(
        &self,
        acc: &mut PatchAccumulator,
        owner: &str,
        owner_type: Option<OwnershipType>,
    ) -> PatchResult<()> {
        match owner_type {
            None => self.owners.remove_entry(acc, owner),
            Some(t) => {
                let path = self.owners.entry_path(owner)?.key(t.as_str());
                acc.append(OWNERSHIP_ASPECT, PatchOpKind::Remove, path, empty_marker())
            }
        }
    }

    pub fn set_owners(&self, acc: &mut PatchAccumulator, owners: &[Owner]) -> PatchResult<()> {
        if let Some(blank) = owners.iter().find(|o| o.owner.is_empty()) {
            return Err(PatchError::invalid_argument(format!(
                "owner with type {} has an empty urn",
                blank.owner_type.as_str()
            )));
        }
        self.owners.set_all(acc, to_value(&owners)?)
    }
}
