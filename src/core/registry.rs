// src/core/registry.rs

//! # Setting Registry
//!
//! The catalog of live settings, keyed by name and iterated in name order.
//!
//! The registry never owns a setting. Whoever declares a setting keeps the
//! [`SettingHandle`]; the registry only holds a [`Weak`] reference to it, so
//! dropping the handle is enough to make the setting disappear from lookups
//! and iteration.
//!
//! The registry also carries the side-table of values read by the last
//! `load`, which `save` uses to keep entries nobody registered this time.

use crate::core::persistence::LoadedSetting;
use crate::core::setting::Setting;
use log::{debug, error};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Shared, mutable ownership of a declared setting.
pub type SettingHandle = Rc<RefCell<Setting>>;

/// Errors raised while registering a setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A live setting already uses this name.
    #[error("A setting named '{0}' is already registered.")]
    DuplicateName(String),
}

/// Wraps a setting into a handle that can be registered.
pub fn handle(setting: Setting) -> SettingHandle {
    Rc::new(RefCell::new(setting))
}

/// Name-ordered catalog of live settings plus the values read by the last
/// load.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) settings: BTreeMap<String, Weak<RefCell<Setting>>>,
    pub(crate) loaded: BTreeMap<String, LoadedSetting>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a setting under its name.
    ///
    /// A name left behind by a dropped setting can be taken over. Entries of
    /// dropped settings are swept out on every registration.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateName`] if a live setting already uses
    /// the name.
    pub fn register(&mut self, setting: &SettingHandle) -> Result<(), RegistryError> {
        let name = setting.borrow().name().to_string();
        self.prune();

        if self.settings.contains_key(&name) {
            error!("Setting '{}' was declared twice.", name);
            return Err(RegistryError::DuplicateName(name));
        }

        debug!("Registering setting '{}'", name);
        self.settings.insert(name, Rc::downgrade(setting));
        Ok(())
    }

    /// Removes a setting, but only if the registered entry is this very
    /// instance. Returns whether anything was removed.
    pub fn unregister(&mut self, setting: &SettingHandle) -> bool {
        let name = setting.borrow().name().to_string();
        let is_same = self
            .settings
            .get(&name)
            .is_some_and(|existing| existing.as_ptr() == Rc::as_ptr(setting));

        if is_same {
            debug!("Unregistering setting '{}'", name);
            self.settings.remove(&name);
        }
        is_same
    }

    /// Drops the entries of settings whose owner let go of them.
    fn prune(&mut self) {
        let before = self.settings.len();
        self.settings.retain(|_, setting| setting.strong_count() > 0);
        let pruned = before - self.settings.len();
        if pruned > 0 {
            debug!("Pruned {} dropped setting(s)", pruned);
        }
    }

    /// Looks up a live setting by exact name.
    pub fn find(&self, name: &str) -> Option<SettingHandle> {
        self.settings.get(name).and_then(Weak::upgrade)
    }

    /// Live settings in name order.
    pub fn iter(&self) -> SettingIter<'_> {
        SettingIter {
            inner: self.settings.values(),
        }
    }

    /// Number of live settings.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no live setting is registered.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Resets every live setting to its default value.
    pub fn reset_all(&self) {
        for setting in self.iter() {
            setting.borrow_mut().reset();
        }
    }
}

/// Cursor over the registry in name order. Settings dropped by their owner
/// are skipped as the cursor reaches them.
#[derive(Debug)]
pub struct SettingIter<'a> {
    inner: btree_map::Values<'a, String, Weak<RefCell<Setting>>>,
}

impl Iterator for SettingIter<'_> {
    type Item = SettingHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(Weak::upgrade)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = SettingHandle;
    type IntoIter = SettingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &Registry) -> Vec<String> {
        registry
            .iter()
            .map(|s| s.borrow().name().to_string())
            .collect()
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = Registry::new();
        let save = handle(Setting::boolean("history.save", "Save history", true));
        registry.register(&save).unwrap();

        let found = registry.find("history.save").unwrap();
        assert!(Rc::ptr_eq(&found, &save));
        assert!(registry.find("history.sav").is_none());
        assert!(registry.find("HISTORY.SAVE").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = Registry::new();
        let first = handle(Setting::boolean("history.save", "Save history", true));
        let second = handle(Setting::integer("history.save", "Other", 1));
        registry.register(&first).unwrap();

        assert_eq!(
            registry.register(&second),
            Err(RegistryError::DuplicateName("history.save".to_string()))
        );
        let found = registry.find("history.save").unwrap();
        assert!(Rc::ptr_eq(&found, &first));
    }

    #[test]
    fn test_iteration_is_in_name_order() {
        let mut registry = Registry::new();
        let handles: Vec<SettingHandle> = ["match.ignore_case", "color.input", "history.save"]
            .into_iter()
            .map(|name| handle(Setting::boolean(name, "desc", false)))
            .collect();
        for h in &handles {
            registry.register(h).unwrap();
        }

        assert_eq!(
            names(&registry),
            vec!["color.input", "history.save", "match.ignore_case"]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_dropped_settings_disappear() {
        let mut registry = Registry::new();
        let kept = handle(Setting::boolean("a.kept", "desc", false));
        let dropped = handle(Setting::boolean("b.dropped", "desc", false));
        registry.register(&kept).unwrap();
        registry.register(&dropped).unwrap();

        drop(dropped);

        assert!(registry.find("b.dropped").is_none());
        assert_eq!(names(&registry), vec!["a.kept"]);

        // The name is free again once its owner is gone.
        let reborn = handle(Setting::integer("b.dropped", "desc", 3));
        assert!(registry.register(&reborn).is_ok());
        assert_eq!(registry.find("b.dropped").unwrap().borrow().as_int(), Some(3));
    }

    #[test]
    fn test_registering_sweeps_out_dropped_entries() {
        let mut registry = Registry::new();
        let kept = handle(Setting::boolean("a.kept", "desc", false));
        let dropped = handle(Setting::boolean("b.dropped", "desc", false));
        registry.register(&kept).unwrap();
        registry.register(&dropped).unwrap();
        drop(dropped);
        assert_eq!(registry.settings.len(), 2);

        let other = handle(Setting::boolean("c.other", "desc", false));
        registry.register(&other).unwrap();

        assert_eq!(registry.settings.len(), 2);
        assert!(!registry.settings.contains_key("b.dropped"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_only_removes_same_instance() {
        let mut registry = Registry::new();
        let original = handle(Setting::boolean("history.save", "desc", false));
        let impostor = handle(Setting::boolean("history.save", "desc", false));
        registry.register(&original).unwrap();

        assert!(!registry.unregister(&impostor));
        assert!(registry.find("history.save").is_some());

        assert!(registry.unregister(&original));
        assert!(registry.find("history.save").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reset_all_restores_defaults() {
        let mut registry = Registry::new();
        let lines = handle(Setting::integer("history.max_lines", "desc", 100));
        registry.register(&lines).unwrap();
        assert!(lines.borrow_mut().set("5"));

        registry.reset_all();
        assert_eq!(lines.borrow().as_int(), Some(100));
    }
}
