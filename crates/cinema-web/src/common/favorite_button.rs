//! Decisions taken after a favorite form was accepted by the server.
//!
//! Nothing here touches the DOM; `favorites.rs` reads the markup into these
//! types and writes the results back.

use crate::config::Messages;

pub const ACTIVE_CLASS: &str = "active";
pub const FAVORITE_ATTRIBUTE: &str = "data-favorite";
pub const HEART: char = '\u{2764}';
pub const HEART_ACTIVE_COLOR: &str = "#ec4899";
pub const HEART_INACTIVE_COLOR: &str = "#d1d5db";
/// Delay between fading a card out and removing it.
pub const CARD_FADE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    FavoritesList,
    Catalog,
}

impl PageContext {
    pub fn from_path(path: &str, favorites_path: &str) -> Self {
        if !favorites_path.is_empty() && path.contains(favorites_path) {
            PageContext::FavoritesList
        } else {
            PageContext::Catalog
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteLabel {
    Add,
    Remove,
}

impl FavoriteLabel {
    pub fn text(self) -> &'static str {
        match self {
            FavoriteLabel::Add => "В избранное",
            FavoriteLabel::Remove => "Убрать из избранного",
        }
    }

    /// Recognises one of the two known labels, `None` for anything else.
    pub fn detect(text: &str) -> Option<Self> {
        if text.contains(FavoriteLabel::Add.text()) {
            Some(FavoriteLabel::Add)
        } else if text.contains(FavoriteLabel::Remove.text()) {
            Some(FavoriteLabel::Remove)
        } else {
            None
        }
    }

    pub fn for_favorite(favorite: bool) -> Self {
        if favorite {
            FavoriteLabel::Remove
        } else {
            FavoriteLabel::Add
        }
    }

    pub fn swapped(self) -> Self {
        match self {
            FavoriteLabel::Add => FavoriteLabel::Remove,
            FavoriteLabel::Remove => FavoriteLabel::Add,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub active: bool,
    /// Explicit `data-favorite` value, when the markup carries one.
    pub favorite: Option<bool>,
    pub label: Option<FavoriteLabel>,
    pub heart: bool,
}

impl ButtonState {
    pub fn from_markup(active: bool, favorite_attr: Option<&str>, text: &str) -> Self {
        let favorite = match favorite_attr.map(str::trim) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                warn!("ignoring {}={:?}", FAVORITE_ATTRIBUTE, other);
                None
            }
            None => None,
        };

        Self {
            active,
            favorite,
            label: FavoriteLabel::detect(text),
            heart: text.contains(HEART),
        }
    }

    /// Whether the button now marks a favorite.
    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(self.active)
    }

    pub fn heart_color(&self) -> Option<&'static str> {
        if !self.heart {
            return None;
        }
        Some(if self.active {
            HEART_ACTIVE_COLOR
        } else {
            HEART_INACTIVE_COLOR
        })
    }
}

pub fn compute_next_button_state(current: &ButtonState) -> ButtonState {
    let favorite = current.favorite.map(|f| !f);
    let label = match (current.label, favorite) {
        (Some(_), Some(favorite)) => Some(FavoriteLabel::for_favorite(favorite)),
        (Some(label), None) => Some(label.swapped()),
        (None, _) => None,
    };

    ButtonState {
        active: !current.active,
        favorite,
        label,
        heart: current.heart,
    }
}

/// What the adapter has to write to go from one state to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPatch {
    pub active: bool,
    pub favorite: Option<bool>,
    pub label: Option<&'static str>,
    pub color: Option<&'static str>,
}

impl ButtonPatch {
    pub fn between(current: &ButtonState, next: &ButtonState) -> Self {
        Self {
            active: next.active,
            favorite: next.favorite,
            label: next
                .label
                .filter(|label| current.label != Some(*label))
                .map(FavoriteLabel::text),
            color: next.heart_color(),
        }
    }
}

/// Write side of a favorite button.
pub trait ButtonTarget {
    fn set_favorite(&self, favorite: bool) -> Result<(), anyhow::Error>;
    fn set_label(&self, label: &str) -> Result<(), anyhow::Error>;
    fn set_color(&self, color: &str) -> Result<(), anyhow::Error>;
    fn set_active(&self, active: bool) -> Result<(), anyhow::Error>;
}

impl ButtonPatch {
    /// Writes every field it can, logging failures; the active class goes last.
    /// Returns whether all writes succeeded.
    pub fn apply(&self, target: &impl ButtonTarget) -> bool {
        let mut results = Vec::with_capacity(4);

        if let Some(favorite) = self.favorite {
            results.push(target.set_favorite(favorite));
        }
        if let Some(label) = self.label {
            results.push(target.set_label(label));
        }
        if let Some(color) = self.color {
            results.push(target.set_color(color));
        }
        results.push(target.set_active(self.active));

        let mut complete = true;
        for e in results.into_iter().filter_map(Result::err) {
            error!("{}", e);
            complete = false;
        }
        complete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRemoval {
    pub show_empty_state: bool,
}

/// Called once the card is gone, with the number of cards still on the page.
pub fn compute_card_removal(remaining: u32, empty_state_present: bool) -> CardRemoval {
    CardRemoval {
        show_empty_state: remaining == 0 && !empty_state_present,
    }
}

pub fn outcome_message<'a>(
    messages: &'a Messages,
    context: PageContext,
    next: Option<&ButtonState>,
) -> &'a str {
    match (context, next) {
        (PageContext::FavoritesList, _) => &messages.removed,
        (PageContext::Catalog, Some(next)) if !next.is_favorite() => &messages.removed,
        (PageContext::Catalog, _) => &messages.added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingButton {
        writes: RefCell<Vec<String>>,
        broken_color: bool,
    }

    impl ButtonTarget for RecordingButton {
        fn set_favorite(&self, favorite: bool) -> Result<(), anyhow::Error> {
            self.writes.borrow_mut().push(format!("favorite={}", favorite));
            Ok(())
        }

        fn set_label(&self, label: &str) -> Result<(), anyhow::Error> {
            self.writes.borrow_mut().push(format!("label={}", label));
            Ok(())
        }

        fn set_color(&self, color: &str) -> Result<(), anyhow::Error> {
            if self.broken_color {
                anyhow::bail!("style rejected {}", color);
            }
            self.writes.borrow_mut().push(format!("color={}", color));
            Ok(())
        }

        fn set_active(&self, active: bool) -> Result<(), anyhow::Error> {
            self.writes.borrow_mut().push(format!("active={}", active));
            Ok(())
        }
    }

    #[test]
    fn test_patch_applies_active_last() {
        let current = ButtonState::from_markup(false, Some("false"), "В избранное");
        let next = compute_next_button_state(&current);
        let button = RecordingButton::default();

        assert!(ButtonPatch::between(&current, &next).apply(&button));
        assert_eq!(
            *button.writes.borrow(),
            vec!["favorite=true", "label=Убрать из избранного", "active=true"]
        );
    }

    #[test]
    fn test_failed_write_does_not_stop_other_fields() {
        let current = ButtonState::from_markup(false, None, "❤ В избранное");
        let next = compute_next_button_state(&current);
        let button = RecordingButton {
            broken_color: true,
            ..Default::default()
        };

        assert!(!ButtonPatch::between(&current, &next).apply(&button));
        assert_eq!(
            *button.writes.borrow(),
            vec!["label=Убрать из избранного", "active=true"]
        );
    }

    #[test]
    fn test_page_context() {
        assert_eq!(
            PageContext::from_path("/user/favorites", "favorites"),
            PageContext::FavoritesList
        );
        assert_eq!(
            PageContext::from_path("/movies/42", "favorites"),
            PageContext::Catalog
        );
        assert_eq!(PageContext::from_path("/", ""), PageContext::Catalog);
    }

    #[test]
    fn test_label_detect() {
        assert_eq!(FavoriteLabel::detect("  В избранное "), Some(FavoriteLabel::Add));
        assert_eq!(
            FavoriteLabel::detect("Убрать из избранного"),
            Some(FavoriteLabel::Remove)
        );
        assert_eq!(FavoriteLabel::detect("Favorite"), None);
    }

    #[test]
    fn test_text_button_toggles_label() {
        let current = ButtonState::from_markup(false, None, "В избранное");
        let next = compute_next_button_state(&current);

        assert!(next.active);
        assert_eq!(next.label, Some(FavoriteLabel::Remove));
        assert_eq!(next.heart_color(), None);

        let patch = ButtonPatch::between(&current, &next);
        assert_eq!(patch.label, Some("Убрать из избранного"));
        assert_eq!(patch.color, None);
    }

    #[test]
    fn test_heart_button_recolors() {
        let current = ButtonState::from_markup(false, None, "❤");
        let next = compute_next_button_state(&current);
        assert_eq!(
            ButtonPatch::between(&current, &next),
            ButtonPatch {
                active: true,
                favorite: None,
                label: None,
                color: Some(HEART_ACTIVE_COLOR),
            }
        );

        let back = compute_next_button_state(&next);
        assert_eq!(back.heart_color(), Some(HEART_INACTIVE_COLOR));
    }

    #[test]
    fn test_unrecognised_label_only_toggles_active() {
        let current = ButtonState::from_markup(true, None, "★ Save");
        let next = compute_next_button_state(&current);
        let patch = ButtonPatch::between(&current, &next);

        assert!(!patch.active);
        assert_eq!(patch.label, None);
        assert_eq!(patch.color, None);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let variants = [
            ButtonState::from_markup(false, None, "В избранное"),
            ButtonState::from_markup(true, None, "Убрать из избранного"),
            ButtonState::from_markup(true, None, "❤"),
            ButtonState::from_markup(false, Some("false"), "В избранное"),
            ButtonState::from_markup(false, None, "other"),
        ];

        for state in variants {
            let twice = compute_next_button_state(&compute_next_button_state(&state));
            assert_eq!(twice, state);
        }
    }

    #[test]
    fn test_explicit_attribute_wins_over_text() {
        // label out of sync with the real state
        let current = ButtonState::from_markup(false, Some("true"), "В избранное");
        let next = compute_next_button_state(&current);

        assert_eq!(next.favorite, Some(false));
        assert!(!next.is_favorite());
        assert_eq!(next.label, Some(FavoriteLabel::Add));
        assert_eq!(ButtonPatch::between(&current, &next).label, None);
    }

    #[test]
    fn test_malformed_attribute_is_ignored() {
        let state = ButtonState::from_markup(true, Some("yes"), "❤");
        assert_eq!(state.favorite, None);
        assert!(state.is_favorite());
    }

    #[test]
    fn test_card_removal() {
        assert_eq!(
            compute_card_removal(2, false),
            CardRemoval {
                show_empty_state: false,
            }
        );
        assert!(compute_card_removal(0, false).show_empty_state);
        assert!(!compute_card_removal(0, true).show_empty_state);
    }

    #[test]
    fn test_outcome_message() {
        let messages = Messages::default();
        assert_eq!(
            outcome_message(&messages, PageContext::FavoritesList, None),
            "Убрано из избранного"
        );

        let added = compute_next_button_state(&ButtonState::from_markup(false, None, "❤"));
        assert_eq!(
            outcome_message(&messages, PageContext::Catalog, Some(&added)),
            "Добавлено в избранное"
        );

        let removed = compute_next_button_state(&added);
        assert_eq!(
            outcome_message(&messages, PageContext::Catalog, Some(&removed)),
            "Убрано из избранного"
        );
        assert_eq!(
            outcome_message(&messages, PageContext::Catalog, None),
            "Добавлено в избранное"
        );
    }
}
