//! Toolbar items per tab and per detail overlay

use crate::config::PlatformProfile;

use super::overlays::OverlayKind;
use super::preferences::Preferences;
use super::types::TabSelection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Leading,
    Trailing,
    Navigation,
    Automatic,
    Cancellation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    Settings,
    OpenVideos,
    AccountsMenu,
    Share,
    SubscriptionToggle,
    Done,
}

impl ToolbarAction {
    /// Key that triggers the action, as shown in toolbar hints
    pub fn key_hint(self) -> &'static str {
        match self {
            ToolbarAction::Settings => ",",
            ToolbarAction::OpenVideos => "o",
            ToolbarAction::AccountsMenu => "a",
            ToolbarAction::Share => "y",
            ToolbarAction::SubscriptionToggle => "s",
            ToolbarAction::Done => "Esc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolbarAction::Settings => "Settings",
            ToolbarAction::OpenVideos => "Open Videos",
            ToolbarAction::AccountsMenu => "Accounts",
            ToolbarAction::Share => "Share",
            ToolbarAction::SubscriptionToggle => "Subscribe",
            ToolbarAction::Done => "Done",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolbarItem {
    pub action: ToolbarAction,
    pub placement: Placement,
}

impl ToolbarItem {
    fn new(action: ToolbarAction, placement: Placement) -> Self {
        Self { action, placement }
    }
}

/// Toolbar of a tab's navigation root. Only the phone layout has one.
pub fn tab_toolbar(profile: PlatformProfile, preferences: &Preferences, tab: TabSelection) -> Vec<ToolbarItem> {
    if profile != PlatformProfile::Phone || tab == TabSelection::Search {
        return Vec::new();
    }

    let mut items = vec![ToolbarItem::new(ToolbarAction::Settings, Placement::Leading)];
    if preferences.show_open_actions_toolbar_item {
        items.push(ToolbarItem::new(ToolbarAction::OpenVideos, Placement::Trailing));
    }
    items.push(ToolbarItem::new(ToolbarAction::AccountsMenu, Placement::Trailing));
    items
}

/// Chrome around a detail overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayChrome {
    pub items: Vec<ToolbarItem>,
    /// Title, subscriber count and toggle drawn inside the content instead of a toolbar
    pub inline_header: bool,
    pub show_subscription_toggle: bool,
}

pub fn overlay_chrome(profile: PlatformProfile, kind: OverlayKind, can_toggle_subscription: bool) -> OverlayChrome {
    let show_subscription_toggle = kind == OverlayKind::Channel && can_toggle_subscription;

    if profile == PlatformProfile::Tv {
        return OverlayChrome {
            items: Vec::new(),
            inline_header: true,
            show_subscription_toggle,
        };
    }

    let share_placement = match profile {
        PlatformProfile::Phone => Placement::Navigation,
        _ => Placement::Automatic,
    };

    let mut items = vec![ToolbarItem::new(ToolbarAction::Share, share_placement)];
    if show_subscription_toggle {
        items.push(ToolbarItem::new(ToolbarAction::SubscriptionToggle, Placement::Automatic));
    }
    items.push(ToolbarItem::new(ToolbarAction::Done, Placement::Cancellation));

    OverlayChrome {
        items,
        inline_header: false,
        show_subscription_toggle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(items: &[ToolbarItem]) -> Vec<ToolbarAction> {
        items.iter().map(|i| i.action).collect()
    }

    #[test]
    fn test_phone_tab_toolbar() {
        let mut prefs = Preferences::default();
        assert_eq!(
            actions(&tab_toolbar(PlatformProfile::Phone, &prefs, TabSelection::Home)),
            vec![ToolbarAction::Settings, ToolbarAction::AccountsMenu]
        );

        prefs.show_open_actions_toolbar_item = true;
        let items = tab_toolbar(PlatformProfile::Phone, &prefs, TabSelection::Trending);
        assert_eq!(
            actions(&items),
            vec![ToolbarAction::Settings, ToolbarAction::OpenVideos, ToolbarAction::AccountsMenu]
        );
        assert_eq!(items[0].placement, Placement::Leading);
        assert_eq!(items[1].placement, Placement::Trailing);
    }

    #[test]
    fn test_search_and_non_phone_have_no_tab_toolbar() {
        let prefs = Preferences {
            show_open_actions_toolbar_item: true,
            ..Preferences::default()
        };
        assert!(tab_toolbar(PlatformProfile::Phone, &prefs, TabSelection::Search).is_empty());
        assert!(tab_toolbar(PlatformProfile::Desktop, &prefs, TabSelection::Home).is_empty());
        assert!(tab_toolbar(PlatformProfile::Tv, &prefs, TabSelection::Home).is_empty());
    }

    #[test]
    fn test_overlay_share_placement() {
        let phone = overlay_chrome(PlatformProfile::Phone, OverlayKind::Playlist, true);
        assert_eq!(phone.items[0], ToolbarItem::new(ToolbarAction::Share, Placement::Navigation));
        assert!(!phone.show_subscription_toggle);

        let desktop = overlay_chrome(PlatformProfile::Desktop, OverlayKind::Channel, true);
        assert_eq!(desktop.items[0].placement, Placement::Automatic);
        assert_eq!(
            actions(&desktop.items),
            vec![ToolbarAction::Share, ToolbarAction::SubscriptionToggle, ToolbarAction::Done]
        );
    }

    #[test]
    fn test_tv_uses_inline_header() {
        let tv = overlay_chrome(PlatformProfile::Tv, OverlayKind::Channel, true);
        assert!(tv.items.is_empty());
        assert!(tv.inline_header);
        assert!(tv.show_subscription_toggle);

        let signed_out = overlay_chrome(PlatformProfile::Tv, OverlayKind::Channel, false);
        assert!(!signed_out.show_subscription_toggle);
    }
}
