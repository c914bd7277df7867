//! Menu bar model.
//!
//! Items are plain data bound to a command; the browser layer draws them and
//! asks each item whether it is enabled or active for the current state.

use crate::commands;
use crate::document::BlockKind;
use crate::marks::Mark;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// Heading levels offered in the "Heading" submenu.
pub const HEADING_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ToggleMark(Mark),
    SetBlockType(BlockKind),
}

impl MenuCommand {
    pub fn run(self, state: &EditorState) -> Option<Transaction> {
        match self {
            MenuCommand::ToggleMark(mark) => commands::toggle_mark(state, mark),
            MenuCommand::SetBlockType(kind) => commands::set_block_type(state, kind),
        }
    }
}

/// A clickable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Text drawn on the item.
    pub label: String,
    /// Tooltip.
    pub title: String,
    pub command: MenuCommand,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, title: impl Into<String>, command: MenuCommand) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            command,
        }
    }

    /// Whether running the item would do anything.
    pub fn enabled(&self, state: &EditorState) -> bool {
        self.command.run(state).is_some()
    }

    /// Whether the item should be drawn as pressed.
    pub fn active(&self, state: &EditorState) -> bool {
        match self.command {
            MenuCommand::ToggleMark(mark) => commands::mark_active(state, mark),
            MenuCommand::SetBlockType(kind) => commands::block_type_active(state, kind),
        }
    }

    pub fn run(&self, state: &EditorState) -> Option<Transaction> {
        self.command.run(state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuElement {
    Item(MenuItem),
    Dropdown {
        label: String,
        content: Vec<MenuElement>,
    },
    Submenu {
        label: String,
        content: Vec<MenuElement>,
    },
}

impl MenuElement {
    pub fn label(&self) -> &str {
        match self {
            MenuElement::Item(item) => &item.label,
            MenuElement::Dropdown { label, .. } | MenuElement::Submenu { label, .. } => label,
        }
    }

    /// Every item in this element, depth first.
    pub fn items(&self) -> Vec<&MenuItem> {
        match self {
            MenuElement::Item(item) => vec![item],
            MenuElement::Dropdown { content, .. } | MenuElement::Submenu { content, .. } => {
                content.iter().flat_map(MenuElement::items).collect()
            }
        }
    }
}

/// The standard menu items.
#[derive(Debug, Clone)]
pub struct MenuItems {
    pub toggle_strong: MenuItem,
    pub toggle_em: MenuItem,
    pub make_paragraph: MenuItem,
    pub make_heading: Vec<MenuItem>,
}

impl Default for MenuItems {
    fn default() -> Self {
        Self::build()
    }
}

impl MenuItems {
    pub fn build() -> Self {
        Self {
            toggle_strong: MenuItem::new(
                "B",
                "Toggle strong style",
                MenuCommand::ToggleMark(Mark::Strong),
            ),
            toggle_em: MenuItem::new("I", "Toggle emphasis", MenuCommand::ToggleMark(Mark::Em)),
            make_paragraph: MenuItem::new(
                "Plain",
                "Change to paragraph",
                MenuCommand::SetBlockType(BlockKind::Paragraph),
            ),
            make_heading: HEADING_LEVELS
                .map(|level| {
                    MenuItem::new(
                        format!("Level {level}"),
                        format!("Change to heading {level}"),
                        MenuCommand::SetBlockType(BlockKind::Heading(level)),
                    )
                })
                .collect(),
        }
    }

    pub fn inline_menu(&self) -> Vec<MenuElement> {
        vec![
            MenuElement::Item(self.toggle_strong.clone()),
            MenuElement::Item(self.toggle_em.clone()),
        ]
    }

    /// "Type..." dropdown: paragraph plus a heading submenu.
    pub fn type_menu(&self) -> MenuElement {
        MenuElement::Dropdown {
            label: "Type...".to_string(),
            content: vec![
                MenuElement::Item(self.make_paragraph.clone()),
                MenuElement::Submenu {
                    label: "Heading".to_string(),
                    content: self
                        .make_heading
                        .iter()
                        .cloned()
                        .map(MenuElement::Item)
                        .collect(),
                },
            ],
        }
    }

    /// Groups drawn in the menu bar, separated from each other.
    pub fn full_menu(&self) -> Vec<Vec<MenuElement>> {
        vec![self.inline_menu(), vec![self.type_menu()]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::types::Selection;

    fn outline(elements: &[MenuElement], prefix: &str, out: &mut Vec<String>) {
        for element in elements {
            let path = format!("{prefix}{}", element.label());
            match element {
                MenuElement::Item(_) => out.push(path),
                MenuElement::Dropdown { content, .. } | MenuElement::Submenu { content, .. } => {
                    outline(content, &format!("{path} > "), out)
                }
            }
        }
    }

    #[test]
    fn test_menu_layout() {
        let mut lines = Vec::new();
        for group in MenuItems::build().full_menu() {
            outline(&group, "", &mut lines);
        }
        insta::assert_debug_snapshot!(lines, @r#"
        [
            "B",
            "I",
            "Type... > Plain",
            "Type... > Heading > Level 1",
            "Type... > Heading > Level 2",
            "Type... > Heading > Level 3",
            "Type... > Heading > Level 4",
            "Type... > Heading > Level 5",
            "Type... > Heading > Level 6",
        ]
        "#);
    }

    #[test]
    fn test_items_follow_state() {
        let items = MenuItems::build();
        let state = EditorState::new(Document::from_text("hello"))
            .with_selection(Selection::new(1, 6))
            .unwrap();

        assert!(items.make_paragraph.active(&state));
        assert!(!items.make_paragraph.enabled(&state));
        assert!(items.make_heading[0].enabled(&state));
        assert!(!items.toggle_strong.active(&state));

        let state = state.apply(&items.toggle_strong.run(&state).unwrap());
        assert!(items.toggle_strong.active(&state));
        assert!(!items.toggle_em.active(&state));

        let state = state.apply(&items.make_heading[2].run(&state).unwrap());
        assert_eq!(state.doc().blocks()[0].kind(), BlockKind::Heading(3));
        assert!(items.make_heading[2].active(&state));
        assert!(items.make_paragraph.enabled(&state));
    }

    #[test]
    fn test_type_menu_items() {
        let items = MenuItems::build();
        assert_eq!(items.type_menu().items().len(), 7);
    }
}
