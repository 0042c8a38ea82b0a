//! Tests for the browser build, run with `wasm-pack test --node`

#[cfg(test)]
mod tests {
    use crate::view::{ButtonId, ViewState};
    use valentine_core::{Content, Stage};
    use wasm_bindgen_test::*;

    fn walk_to_question(view: &mut ViewState) {
        view.handle_key("y");
        view.handle_key("Enter");
        for _ in 0..view.session().content().reason_count() {
            view.handle_key("Enter");
        }
        view.handle_key("End");
        view.handle_key("Enter");
        view.handle_key("o");
        view.handle_key("Enter");
    }

    #[wasm_bindgen_test]
    fn test_new_view_starts_at_identity() {
        let view = ViewState::default();
        assert_eq!(view.stage(), Stage::Identity);
        assert_eq!(view.focused_button(), Some(ButtonId::IdentityYes));
        assert_eq!(view.hearts().hearts().len(), 20);
    }

    #[wasm_bindgen_test]
    fn test_unseeded_randomness_works_in_browser() {
        let mut view = ViewState::default();
        walk_to_question(&mut view);
        assert_eq!(view.stage(), Stage::Question);
        view.handle_key("n");
        assert!(view.session().dodge_offset().is_within_bounds());
    }

    #[wasm_bindgen_test]
    fn test_keyboard_walk() {
        let mut view = ViewState::new(Content::default(), Some(2));
        walk_to_question(&mut view);
        assert_eq!(view.stage(), Stage::Question);

        // Tabbing onto "no" makes it run away
        let before = view.session().dodge_offset();
        view.handle_key("Tab");
        assert_eq!(view.focused_button(), Some(ButtonId::ProposalNo));
        assert_ne!(view.session().dodge_offset(), before);

        view.handle_key("y");
        assert_eq!(view.stage(), Stage::Success);
        assert!(!view.handle_key("Enter"));
    }

    #[wasm_bindgen_test]
    fn test_custom_content() {
        let content = Content::from_json(r#"{ "name": "Sam", "reasons": ["Only one"] }"#).unwrap();
        let mut view = ViewState::new(content, Some(9));
        view.handle_key("y");
        view.handle_key("Enter");
        assert_eq!(view.session().current_reason(), Some("Only one"));
        view.handle_key("Enter");
        assert_eq!(view.stage(), Stage::Journey);
    }

    #[wasm_bindgen_test]
    fn test_state_json() {
        let mut view = ViewState::new(Content::default(), Some(5));
        view.handle_key("y");
        let json = serde_json::to_string(&view.snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stage"], "welcome");
        assert_eq!(value["reason_count"], 11);
        assert_eq!(value["celebration_fired"], 0);
    }
}
