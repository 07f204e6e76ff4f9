//! Tab visibility resolution and the selected-tab binding

use std::collections::BTreeSet;

use super::accounts::AccountProvider;
use super::preferences::Preferences;
use super::types::{Capabilities, TabSelection, VisibleSection};

/// More enabled sections than this hides the Popular tab
const POPULAR_SECTION_CAP: usize = 5;

/// Which content view a tab renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabContent {
    HomeFeed,
    DocumentsBrowser,
    SubscriptionsFeed,
    PopularListing,
    TrendingListing,
    UserPlaylists,
    SearchResults,
}

impl From<TabSelection> for TabContent {
    fn from(tab: TabSelection) -> Self {
        match tab {
            TabSelection::Home => TabContent::HomeFeed,
            TabSelection::Documents => TabContent::DocumentsBrowser,
            TabSelection::Subscriptions => TabContent::SubscriptionsFeed,
            TabSelection::Popular => TabContent::PopularListing,
            TabSelection::Trending => TabContent::TrendingListing,
            TabSelection::Playlists => TabContent::UserPlaylists,
            TabSelection::Search => TabContent::SearchResults,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabDescriptor {
    pub selection: TabSelection,
    pub label: &'static str,
    pub icon: &'static str,
    pub content: TabContent,
}

impl TabDescriptor {
    pub fn new(selection: TabSelection) -> Self {
        Self {
            selection,
            label: selection.label(),
            icon: selection.icon(),
            content: selection.into(),
        }
    }
}

/// Everything tab visibility depends on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabInputs {
    pub show_home: bool,
    pub show_documents: bool,
    pub show_open_actions_toolbar_item: bool,
    pub visible_sections: BTreeSet<VisibleSection>,
    pub capabilities: Capabilities,
    pub has_accounts: bool,
    pub anonymous: bool,
}

impl TabInputs {
    pub fn gather(preferences: &Preferences, accounts: &impl AccountProvider) -> Self {
        Self {
            show_home: preferences.show_home,
            show_documents: preferences.show_documents,
            show_open_actions_toolbar_item: preferences.show_open_actions_toolbar_item,
            visible_sections: preferences.visible_sections.clone(),
            capabilities: accounts.capabilities(),
            has_accounts: !accounts.is_empty(),
            anonymous: !accounts.signed_in(),
        }
    }

    fn shows(&self, section: VisibleSection) -> bool {
        self.visible_sections.contains(&section)
    }
}

/// Compute the ordered list of visible tabs. Never fails; may be empty.
pub fn resolve_tabs(inputs: &TabInputs) -> Vec<TabDescriptor> {
    let mut tabs = Vec::with_capacity(TabSelection::ALL.len());

    if inputs.show_home {
        tabs.push(TabDescriptor::new(TabSelection::Home));
    }
    if inputs.show_documents {
        tabs.push(TabDescriptor::new(TabSelection::Documents));
    }
    if !inputs.has_accounts {
        return tabs;
    }

    let caps = inputs.capabilities;

    if inputs.shows(VisibleSection::Subscriptions) && caps.supports_subscriptions && !inputs.anonymous {
        tabs.push(TabDescriptor::new(TabSelection::Subscriptions));
    }
    if inputs.shows(VisibleSection::Popular)
        && caps.supports_popular
        && inputs.visible_sections.len() < POPULAR_SECTION_CAP
    {
        tabs.push(TabDescriptor::new(TabSelection::Popular));
    }
    if inputs.shows(VisibleSection::Trending) {
        tabs.push(TabDescriptor::new(TabSelection::Trending));
    }
    if inputs.shows(VisibleSection::Playlists) && caps.supports_user_playlists && !inputs.anonymous {
        tabs.push(TabDescriptor::new(TabSelection::Playlists));
    }
    tabs.push(TabDescriptor::new(TabSelection::Search));

    tabs
}

/// A resolved tab list stamped with the recomputation that produced it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabList {
    pub generation: u64,
    pub tabs: Vec<TabDescriptor>,
}

impl TabList {
    pub fn contains(&self, selection: TabSelection) -> bool {
        self.position(selection).is_some()
    }

    pub fn position(&self, selection: TabSelection) -> Option<usize> {
        self.tabs.iter().position(|t| t.selection == selection)
    }

    pub fn selections(&self) -> Vec<TabSelection> {
        self.tabs.iter().map(|t| t.selection).collect()
    }
}

struct CachedTabs {
    account_id: Option<String>,
    inputs: TabInputs,
    list: TabList,
}

/// Memoizing wrapper around [`resolve_tabs`], keyed by the active account.
#[derive(Default)]
pub struct TabVisibilityResolver {
    cache: Option<CachedTabs>,
    generation: u64,
}

impl TabVisibilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the memoized list. Called on every account switch.
    pub fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            tracing::debug!("Tab list invalidated");
        }
    }

    pub fn resolve(&mut self, account_id: Option<&str>, inputs: TabInputs) -> TabList {
        if let Some(cached) = &self.cache {
            if cached.account_id.as_deref() != account_id {
                self.invalidate();
            } else if cached.inputs == inputs {
                return cached.list.clone();
            }
        }

        self.generation += 1;
        let list = TabList {
            generation: self.generation,
            tabs: resolve_tabs(&inputs),
        };
        tracing::debug!(
            generation = list.generation,
            account = account_id.unwrap_or("-"),
            tabs = ?list.selections(),
            "Resolved tabs"
        );
        self.cache = Some(CachedTabs {
            account_id: account_id.map(str::to_owned),
            inputs,
            list: list.clone(),
        });
        list
    }
}

/// Two-way binding for the selected tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabSelectionBinding {
    selection: TabSelection,
}

impl Default for TabSelectionBinding {
    fn default() -> Self {
        Self::new(TabSelection::Home)
    }
}

impl TabSelectionBinding {
    pub fn new(selection: TabSelection) -> Self {
        Self { selection }
    }

    pub fn get(&self) -> TabSelection {
        self.selection
    }

    /// Select `tab` if it is visible
    pub fn select(&mut self, tab: TabSelection, tabs: &TabList) -> bool {
        if tabs.contains(tab) {
            self.selection = tab;
            true
        } else {
            false
        }
    }

    /// Keep the selection while visible, otherwise fall back to the first tab.
    /// With no visible tabs the selection is left as is.
    pub fn reconcile(&mut self, tabs: &TabList) -> bool {
        if tabs.contains(self.selection) {
            return false;
        }
        match tabs.tabs.first() {
            Some(first) => {
                tracing::debug!(from = ?self.selection, to = ?first.selection, "Selected tab no longer visible");
                self.selection = first.selection;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self, tabs: &TabList) {
        self.step(tabs, 1);
    }

    pub fn select_previous(&mut self, tabs: &TabList) {
        self.step(tabs, tabs.tabs.len().saturating_sub(1));
    }

    fn step(&mut self, tabs: &TabList, offset: usize) {
        if tabs.tabs.is_empty() {
            return;
        }
        let index = tabs
            .position(self.selection)
            .map(|i| (i + offset) % tabs.tabs.len())
            .unwrap_or(0);
        self.selection = tabs.tabs[index].selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_caps() -> Capabilities {
        Capabilities {
            supports_subscriptions: true,
            supports_user_playlists: true,
            supports_popular: true,
        }
    }

    fn inputs(sections: &[VisibleSection]) -> TabInputs {
        TabInputs {
            show_home: true,
            show_documents: true,
            show_open_actions_toolbar_item: false,
            visible_sections: sections.iter().copied().collect(),
            capabilities: all_caps(),
            has_accounts: true,
            anonymous: false,
        }
    }

    fn selections(inputs: &TabInputs) -> Vec<TabSelection> {
        resolve_tabs(inputs).into_iter().map(|t| t.selection).collect()
    }

    /// Independent statement of the gating rules, used to check every combination
    fn expected(inputs: &TabInputs) -> Vec<TabSelection> {
        let caps = inputs.capabilities;
        let count = inputs.visible_sections.len();
        TabSelection::ALL
            .into_iter()
            .filter(|tab| match tab {
                TabSelection::Home => inputs.show_home,
                TabSelection::Documents => inputs.show_documents,
                _ if !inputs.has_accounts => false,
                TabSelection::Subscriptions => {
                    inputs.shows(VisibleSection::Subscriptions) && caps.supports_subscriptions && !inputs.anonymous
                }
                TabSelection::Popular => {
                    inputs.shows(VisibleSection::Popular) && caps.supports_popular && count < 5
                }
                TabSelection::Trending => inputs.shows(VisibleSection::Trending),
                TabSelection::Playlists => {
                    inputs.shows(VisibleSection::Playlists) && caps.supports_user_playlists && !inputs.anonymous
                }
                TabSelection::Search => true,
            })
            .collect()
    }

    #[test]
    fn test_every_combination_matches_rules() {
        for mask in 0u32..(1 << 14) {
            let bit = |n: u32| mask & (1 << n) != 0;
            let sections: BTreeSet<VisibleSection> = VisibleSection::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| bit(*i as u32))
                .map(|(_, s)| s)
                .collect();
            let inputs = TabInputs {
                show_home: bit(7),
                show_documents: bit(8),
                show_open_actions_toolbar_item: bit(9),
                visible_sections: sections,
                capabilities: Capabilities {
                    supports_subscriptions: bit(10),
                    supports_user_playlists: bit(11),
                    supports_popular: bit(12),
                },
                has_accounts: bit(13),
                anonymous: mask % 3 == 0,
            };
            let resolved = selections(&inputs);
            assert_eq!(resolved, expected(&inputs), "mask {mask:#b}");
            assert_eq!(resolved.contains(&TabSelection::Search), inputs.has_accounts);
        }
    }

    #[test]
    fn test_no_accounts_only_local_tabs() {
        let mut inputs = inputs(&VisibleSection::ALL);
        inputs.has_accounts = false;
        assert_eq!(selections(&inputs), vec![TabSelection::Home, TabSelection::Documents]);

        inputs.show_home = false;
        inputs.show_documents = false;
        assert!(resolve_tabs(&inputs).is_empty());
    }

    #[test]
    fn test_popular_hidden_by_section_cap() {
        let inputs = inputs(&[
            VisibleSection::Subscriptions,
            VisibleSection::Popular,
            VisibleSection::Trending,
            VisibleSection::Playlists,
            VisibleSection::Search,
        ]);
        let tabs = selections(&inputs);
        assert!(!tabs.contains(&TabSelection::Popular));
        assert!(tabs.contains(&TabSelection::Subscriptions));
        assert!(tabs.contains(&TabSelection::Trending));
        assert!(tabs.contains(&TabSelection::Playlists));

        let four = super::tests::inputs(&[
            VisibleSection::Subscriptions,
            VisibleSection::Popular,
            VisibleSection::Trending,
            VisibleSection::Playlists,
        ]);
        assert!(selections(&four).contains(&TabSelection::Popular));
    }

    #[test]
    fn test_anonymous_account_hides_personal_tabs() {
        let mut inputs = inputs(&[VisibleSection::Subscriptions, VisibleSection::Playlists, VisibleSection::Trending]);
        inputs.anonymous = true;
        assert_eq!(
            selections(&inputs),
            vec![TabSelection::Home, TabSelection::Documents, TabSelection::Trending, TabSelection::Search]
        );
    }

    #[test]
    fn test_descriptor_carries_label_icon_content() {
        let tab = TabDescriptor::new(TabSelection::Playlists);
        assert_eq!(tab.label, "Playlists");
        assert_eq!(tab.icon, "☰");
        assert_eq!(tab.content, TabContent::UserPlaylists);
    }

    #[test]
    fn test_resolver_memoizes_until_inputs_change() {
        let mut resolver = TabVisibilityResolver::new();
        let first = resolver.resolve(Some("a"), inputs(&[VisibleSection::Trending]));
        let again = resolver.resolve(Some("a"), inputs(&[VisibleSection::Trending]));
        assert_eq!(first.generation, again.generation);

        let changed = resolver.resolve(Some("a"), inputs(&[VisibleSection::Popular]));
        assert!(changed.generation > first.generation);
        assert!(changed.contains(TabSelection::Popular));
    }

    #[test]
    fn test_account_switch_discards_memoized_list() {
        let mut resolver = TabVisibilityResolver::new();
        let a = resolver.resolve(Some("a"), inputs(&[VisibleSection::Trending]));
        let b = resolver.resolve(Some("b"), inputs(&[VisibleSection::Trending]));
        assert_eq!(a.tabs, b.tabs);
        assert_ne!(a.generation, b.generation);

        resolver.invalidate();
        let b_again = resolver.resolve(Some("b"), inputs(&[VisibleSection::Trending]));
        assert_ne!(b.generation, b_again.generation);
    }

    #[test]
    fn test_selection_falls_back_to_first_visible() {
        let mut resolver = TabVisibilityResolver::new();
        let tabs = resolver.resolve(Some("a"), inputs(&[VisibleSection::Trending]));
        let mut binding = TabSelectionBinding::new(TabSelection::Trending);
        assert!(!binding.reconcile(&tabs));
        assert_eq!(binding.get(), TabSelection::Trending);

        let mut without_trending = inputs(&[]);
        without_trending.show_home = false;
        let tabs = resolver.resolve(Some("a"), without_trending);
        assert!(binding.reconcile(&tabs));
        assert_eq!(binding.get(), TabSelection::Documents);
    }

    #[test]
    fn test_selection_kept_when_nothing_visible() {
        let empty = TabList { generation: 1, tabs: vec![] };
        let mut binding = TabSelectionBinding::new(TabSelection::Search);
        assert!(!binding.reconcile(&empty));
        assert_eq!(binding.get(), TabSelection::Search);
        binding.select_next(&empty);
        assert_eq!(binding.get(), TabSelection::Search);
    }

    #[test]
    fn test_select_cycles_visible_tabs_only() {
        let tabs = TabList {
            generation: 1,
            tabs: resolve_tabs(&inputs(&[VisibleSection::Trending])),
        };
        let mut binding = TabSelectionBinding::new(TabSelection::Home);
        assert!(!binding.select(TabSelection::Popular, &tabs));

        binding.select_next(&tabs);
        assert_eq!(binding.get(), TabSelection::Documents);
        binding.select_previous(&tabs);
        binding.select_previous(&tabs);
        assert_eq!(binding.get(), TabSelection::Search);
        binding.select_next(&tabs);
        assert_eq!(binding.get(), TabSelection::Home);
    }
}
