//! Window data model and the manager that filters, orders, and aliases the
//! candidate window list for the root processor.

use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging;
use crate::processor::ProcessorInput;
use crate::strcompare;

/// Identity of one OS window. Equality follows the executable, process, and
/// native handle; the title is display data that may change between
/// refreshes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinInfo {
    pub title: String,
    pub exe: String,
    pub pid: u32,
    pub handle: u64,
}

impl PartialEq for WinInfo {
    fn eq(&self, other: &Self) -> bool {
        self.exe == other.exe && self.pid == other.pid && self.handle == other.handle
    }
}

impl Eq for WinInfo {}

impl Hash for WinInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exe.hash(state);
        self.pid.hash(state);
        self.handle.hash(state);
    }
}

/// Source of candidate windows and the window-activation effect. The OS
/// binding lives outside the core.
pub trait WindowProvider {
    fn list_windows(&self) -> Vec<WinInfo>;
    fn focus(&self, win: &WinInfo) -> Result<(), String>;
}

/// Provider with no windows, used when no OS binding is attached.
pub struct NullWindowProvider;

impl WindowProvider for NullWindowProvider {
    fn list_windows(&self) -> Vec<WinInfo> {
        Vec::new()
    }

    fn focus(&self, _win: &WinInfo) -> Result<(), String> {
        Ok(())
    }
}

/// Deterministic provider for tests; records focus requests.
#[derive(Default)]
pub struct FixtureWindowProvider {
    windows: Vec<WinInfo>,
    focused: std::cell::RefCell<Vec<WinInfo>>,
}

impl FixtureWindowProvider {
    pub fn from_windows(windows: Vec<WinInfo>) -> Self {
        Self {
            windows,
            focused: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn deterministic_fixture() -> Self {
        Self::from_windows(vec![
            WinInfo {
                title: "Quarterly Report - Editor".to_string(),
                exe: "editor.exe".to_string(),
                pid: 101,
                handle: 1,
            },
            WinInfo {
                title: "Downloads".to_string(),
                exe: "explorer.exe".to_string(),
                pid: 102,
                handle: 2,
            },
            WinInfo {
                title: "Terminal".to_string(),
                exe: "term.exe".to_string(),
                pid: 103,
                handle: 3,
            },
        ])
    }

    pub fn focused(&self) -> Vec<WinInfo> {
        self.focused.borrow().clone()
    }
}

impl WindowProvider for FixtureWindowProvider {
    fn list_windows(&self) -> Vec<WinInfo> {
        self.windows.clone()
    }

    fn focus(&self, win: &WinInfo) -> Result<(), String> {
        self.focused.borrow_mut().push(win.clone());
        Ok(())
    }
}

/// One exclusion rule: a window is excluded when every given field matches
/// exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRule {
    pub title: Option<String>,
    pub exe: Option<String>,
}

/// Exclusion rules loaded from a YAML file; reloadable while running.
pub struct WinExcluder {
    path: Option<PathBuf>,
    rules: Vec<ExcludeRule>,
}

impl WinExcluder {
    pub fn new(path: Option<PathBuf>) -> Self {
        let mut excluder = Self {
            path,
            rules: Vec::new(),
        };
        excluder.reload();
        excluder
    }

    /// Re-reads the exclusion file. A missing or unreadable file clears the
    /// rules rather than failing.
    pub fn reload(&mut self) {
        self.rules = Vec::new();
        let Some(path) = &self.path else {
            return;
        };
        let Ok(raw) = fs::read_to_string(path) else {
            return;
        };
        match serde_yaml::from_str::<Vec<ExcludeRule>>(&raw) {
            Ok(rules) => {
                self.rules = rules
                    .into_iter()
                    .map(|rule| ExcludeRule {
                        title: rule.title.filter(|t| !t.is_empty()),
                        exe: rule.exe.filter(|e| !e.is_empty()),
                    })
                    .collect();
            }
            Err(error) => {
                logging::warn(&format!("exclusion file parse failed: {error}"));
            }
        }
    }

    pub fn is_excluded(&self, win: &WinInfo) -> bool {
        for rule in &self.rules {
            let matched = match (rule.title.as_deref(), rule.exe.as_deref()) {
                (Some(title), Some(exe)) => title == win.title && exe == win.exe,
                (Some(title), None) => title == win.title,
                (None, Some(exe)) => exe == win.exe,
                (None, None) => false,
            };
            if matched {
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Title,
    Exe,
    Alias,
}

#[derive(Debug, Clone)]
pub struct ManagedWindow {
    pub num: usize,
    pub info: WinInfo,
    pub is_displayed: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum FilterField {
    Title,
    Exe,
    Alias,
}

/// Owns the known-window snapshot, the display filter state, the sort order,
/// and the persisted alias map.
pub struct WinManager {
    provider: Box<dyn WindowProvider>,
    excluder: WinExcluder,
    alias_path: PathBuf,
    aliases: HashMap<WinInfo, String>,
    order_by: Option<OrderBy>,
    windows: Vec<ManagedWindow>,
    selected: Option<WinInfo>,
}

impl WinManager {
    pub fn new(
        alias_path: PathBuf,
        exclude_path: Option<PathBuf>,
        provider: Box<dyn WindowProvider>,
    ) -> Self {
        let aliases = load_alias_file(&alias_path);
        Self {
            provider,
            excluder: WinExcluder::new(exclude_path),
            alias_path,
            aliases,
            order_by: None,
            windows: Vec::new(),
            selected: None,
        }
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.order_by
    }

    pub fn len_allwins(&self) -> usize {
        self.windows.len()
    }

    pub fn selected_win(&self) -> Option<&ManagedWindow> {
        let selected = self.selected.as_ref()?;
        self.windows.iter().find(|win| win.info == *selected)
    }

    /// Index of the selected window within the displayed list, 0 when there
    /// is no selection.
    pub fn selected_index(&self) -> usize {
        let Some(selected) = &self.selected else {
            return 0;
        };
        self.displayed_wins()
            .iter()
            .position(|win| win.info == *selected)
            .unwrap_or(0)
    }

    /// Displayed windows in render order, applying the current sort field.
    pub fn displayed_wins(&self) -> Vec<ManagedWindow> {
        let mut wins: Vec<ManagedWindow> = self
            .windows
            .iter()
            .filter(|win| win.is_displayed)
            .cloned()
            .collect();
        if let Some(order_by) = self.order_by {
            wins.sort_by_key(|win| match order_by {
                OrderBy::Title => win.info.title.clone(),
                OrderBy::Exe => win.info.exe.clone(),
                OrderBy::Alias => self.get_alias(&win.info),
            });
        }
        wins
    }

    pub fn reload_exclusions(&mut self) {
        self.excluder.reload();
    }

    /// Rebuilds the window list from the provider, keeping the selection
    /// when its window still exists. Clears any sort order.
    pub fn refresh(&mut self) {
        let prior_selected = self.selected.take();
        self.windows = Vec::new();
        self.order_by = None;
        let mut num = 1;
        for info in self.provider.list_windows() {
            if self.excluder.is_excluded(&info) {
                continue;
            }
            if prior_selected.as_ref() == Some(&info) {
                self.selected = Some(info.clone());
            }
            self.windows.push(ManagedWindow {
                num,
                info,
                is_displayed: true,
            });
            num += 1;
        }
        if self.selected.is_none() {
            self.selected = self.windows.first().map(|win| win.info.clone());
        }
    }

    /// Carries the shell's selection into the manager, resets display flags,
    /// and refreshes the window snapshot.
    pub fn update(&mut self, input: &ProcessorInput, with_refresh: bool) {
        if input.was_hidden {
            self.selected = None;
        } else if let Some(selnum) = input.selected_row {
            let displayed = self.displayed_wins();
            if let Some(win) = displayed.get(selnum) {
                self.selected = Some(win.info.clone());
            }
        }
        for win in &mut self.windows {
            win.is_displayed = true;
        }
        // Refresh must run after the selection update.
        if with_refresh {
            self.refresh();
        }
    }

    /// Narrows the displayed set to windows whose field matches `cmdtext`.
    /// When the selected window drops out, selection falls back to the
    /// nearest previous window that stayed displayed.
    pub fn filter(&mut self, cmdtext: &str, field: FilterField, exact: bool) {
        let order: Vec<WinInfo> = self
            .displayed_wins()
            .into_iter()
            .map(|win| win.info)
            .collect();
        let mut prev_displayed: Option<WinInfo> = None;
        for info in order {
            let wintext = match field {
                FilterField::Title => info.title.clone(),
                FilterField::Exe => info.exe.clone(),
                FilterField::Alias => self.get_alias(&info),
            };
            let displayed = if wintext.is_empty() {
                false
            } else if exact {
                strcompare::exact(cmdtext, &wintext)
            } else {
                strcompare::choice(cmdtext, &wintext)
            };
            if let Some(win) = self.windows.iter_mut().find(|win| win.info == info) {
                win.is_displayed = displayed;
            }
            if !displayed && self.selected.as_ref() == Some(&info) {
                self.selected = prev_displayed.clone();
            }
            if displayed {
                prev_displayed = Some(info);
            }
        }
    }

    /// Sets the sort field from a prefix of `title`, `exe`, or `alias`.
    /// Anything else clears the ordering and reports failure.
    pub fn set_orderby(&mut self, orderby: &str) -> bool {
        if orderby.is_empty() {
            self.order_by = None;
            return false;
        }
        for (name, value) in [
            ("title", OrderBy::Title),
            ("exe", OrderBy::Exe),
            ("alias", OrderBy::Alias),
        ] {
            if name.starts_with(orderby) {
                self.order_by = Some(value);
                return true;
            }
        }
        self.order_by = None;
        false
    }

    pub fn get_alias(&self, info: &WinInfo) -> String {
        self.aliases.get(info).cloned().unwrap_or_default()
    }

    /// Assigns an alias to a window, stealing it from any window that held
    /// the same alias before. An empty alias clears on the next save.
    pub fn set_alias(&mut self, info: &WinInfo, alias: &str) {
        if !alias.is_empty() {
            let holder = self
                .aliases
                .iter()
                .find(|(_, existing)| existing.as_str() == alias)
                .map(|(win, _)| win.clone());
            if let Some(holder) = holder {
                self.aliases.remove(&holder);
            }
        }
        self.aliases.insert(info.clone(), alias.to_string());
        self.save_alias_file();
    }

    pub fn delete_all_aliases(&mut self) {
        self.aliases = HashMap::new();
        self.save_alias_file();
    }

    pub fn focus_selected(&self) -> bool {
        let Some(selected) = self.selected_win() else {
            return false;
        };
        if let Err(error) = self.provider.focus(&selected.info) {
            logging::warn(&format!("window focus failed: {error}"));
        }
        true
    }

    /// Writes aliases for live windows; empty aliases and aliases of closed
    /// windows are pruned from memory as a side effect.
    fn save_alias_file(&mut self) {
        let live: Vec<&WinInfo> = self.windows.iter().map(|win| &win.info).collect();
        let mut out: Vec<(WinInfo, String)> = Vec::new();
        let mut prune: Vec<WinInfo> = Vec::new();
        for (info, alias) in &self.aliases {
            if alias.is_empty() || !live.contains(&info) {
                prune.push(info.clone());
            } else {
                out.push((info.clone(), alias.clone()));
            }
        }
        match serde_json::to_string(&out) {
            Ok(encoded) => {
                if let Err(error) = fs::write(&self.alias_path, encoded) {
                    logging::warn(&format!(
                        "alias write failed for {}: {error}",
                        self.alias_path.display()
                    ));
                }
            }
            Err(error) => logging::warn(&format!("alias encode failed: {error}")),
        }
        for info in prune {
            self.aliases.remove(&info);
        }
    }
}

fn load_alias_file(path: &Path) -> HashMap<WinInfo, String> {
    let Ok(raw) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    let Ok(pairs) = serde_json::from_str::<Vec<(WinInfo, String)>>(&raw) else {
        return HashMap::new();
    };
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{ExcludeRule, WinExcluder, WinInfo};

    fn win(title: &str, exe: &str) -> WinInfo {
        WinInfo {
            title: title.to_string(),
            exe: exe.to_string(),
            pid: 1,
            handle: 1,
        }
    }

    #[test]
    fn excludes_by_title_exe_or_both() {
        let mut excluder = WinExcluder::new(None);
        excluder.rules = vec![
            ExcludeRule {
                title: Some("Hidden".to_string()),
                exe: None,
            },
            ExcludeRule {
                title: None,
                exe: Some("daemon.exe".to_string()),
            },
            ExcludeRule {
                title: Some("Setup".to_string()),
                exe: Some("installer.exe".to_string()),
            },
        ];

        assert!(excluder.is_excluded(&win("Hidden", "any.exe")));
        assert!(excluder.is_excluded(&win("whatever", "daemon.exe")));
        assert!(excluder.is_excluded(&win("Setup", "installer.exe")));
        assert!(!excluder.is_excluded(&win("Setup", "other.exe")));
        assert!(!excluder.is_excluded(&win("Visible", "app.exe")));
    }
}
