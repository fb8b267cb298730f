//! Disclosure groups: accordion, dropdown and drawer open/close state.
//!
//! A group stores one optional open index instead of a flag per item, so at
//! most one item per group can be open.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use crate::config::GroupSpec;
use crate::errors::AppError;

/// State of a single item in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelState {
    Open,
    Closed,
}

/// A group of `len` items with at most one open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureGroup {
    len: usize,
    open: Option<usize>,
}

impl DisclosureGroup {
    /// All items start closed.
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn item_count(&self) -> usize {
        self.len
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    /// State of every item, in index order.
    pub fn states(&self) -> Vec<PanelState> {
        (0..self.len)
            .map(|index| {
                if self.open == Some(index) {
                    PanelState::Open
                } else {
                    PanelState::Closed
                }
            })
            .collect()
    }

    /// Click: open `index`, or close it if it is already the open item.
    pub fn activate(&mut self, index: usize) -> Result<(), AppError> {
        self.check(index)?;
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(())
    }

    /// Hover enter: open `index`, closing any sibling.
    pub fn open(&mut self, index: usize) -> Result<(), AppError> {
        self.check(index)?;
        self.open = Some(index);
        Ok(())
    }

    /// Hover leave: close `index` if it is the open item.
    pub fn close(&mut self, index: usize) -> Result<(), AppError> {
        self.check(index)?;
        if self.open == Some(index) {
            self.open = None;
        }
        Ok(())
    }

    pub fn dismiss(&mut self) {
        self.open = None;
    }

    fn check(&self, index: usize) -> Result<(), AppError> {
        if index < self.len {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Item index {} out of range for group of {}",
                index, self.len
            )))
        }
    }
}

/// Operation applied to a group through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Activate(usize),
    Open(usize),
    Close(usize),
    Dismiss,
}

/// Serializable view of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub name: String,
    pub len: usize,
    pub open_index: Option<usize>,
    pub states: Vec<PanelState>,
}

impl GroupView {
    fn new(name: &str, group: &DisclosureGroup) -> Self {
        Self {
            name: name.to_string(),
            len: group.item_count(),
            open_index: group.open_index(),
            states: group.states(),
        }
    }
}

/// Named groups registered at startup.
#[derive(Debug, Default)]
pub struct DisclosureRegistry {
    groups: RwLock<BTreeMap<String, DisclosureGroup>>,
}

impl DisclosureRegistry {
    pub fn from_specs(specs: &[GroupSpec]) -> Self {
        let groups = specs
            .iter()
            .map(|spec| (spec.name.clone(), DisclosureGroup::new(spec.len)))
            .collect();
        Self {
            groups: RwLock::new(groups),
        }
    }

    pub fn list(&self) -> Vec<GroupView> {
        let groups = self.groups.read().unwrap_or_else(PoisonError::into_inner);
        groups
            .iter()
            .map(|(name, group)| GroupView::new(name, group))
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<GroupView, AppError> {
        let groups = self.groups.read().unwrap_or_else(PoisonError::into_inner);
        groups
            .get(name)
            .map(|group| GroupView::new(name, group))
            .ok_or_else(|| unknown_group(name))
    }

    pub fn apply(&self, name: &str, action: GroupAction) -> Result<GroupView, AppError> {
        let mut groups = self.groups.write().unwrap_or_else(PoisonError::into_inner);
        let group = groups.get_mut(name).ok_or_else(|| unknown_group(name))?;

        match action {
            GroupAction::Activate(index) => group.activate(index)?,
            GroupAction::Open(index) => group.open(index)?,
            GroupAction::Close(index) => group.close(index)?,
            GroupAction::Dismiss => group.dismiss(),
        }

        tracing::debug!(group = name, ?action, open = ?group.open_index(), "Disclosure updated");
        Ok(GroupView::new(name, group))
    }
}

fn unknown_group(name: &str) -> AppError {
    AppError::NotFound(format!("Group {} not found", name))
}
