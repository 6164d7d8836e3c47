use super::{escape_html, Component};
use crate::entities::{EntityId, EntityKind, EntityOption};
use std::fmt::Write as _;

pub const FILTERS_FORM_ID: &str = "dashboard-filters-form";
pub const ENTITY_SELECTOR_ID: &str = "entity-selector";

/// Profile type radio group. Changing the selection asks the server for the
/// matching entity dropdown.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRadio {
    pub selected: EntityKind,
}

impl Component for ProfileRadio {
    fn render(&self) -> String {
        let mut html = String::from(r#"<div class="profile-type">"#);
        for kind in EntityKind::ordered() {
            let checked = if kind == self.selected { " checked" } else { "" };
            write!(
                html,
                r##"<label><input type="radio" name="profile_type" value="{label}" hx-get="/update_dropdown" hx-target="#{target}"{checked}> {label}</label>"##,
                label = kind.label(),
                target = ENTITY_SELECTOR_ID,
            )
            .expect("write radio option");
        }
        html.push_str("</div>");
        html
    }
}

/// `<select>` listing every entity of one kind.
#[derive(Debug, Clone)]
pub struct EntityDropdown<'a> {
    pub options: &'a [EntityOption],
    pub selected: Option<EntityId>,
}

impl Component for EntityDropdown<'_> {
    fn render(&self) -> String {
        if self.options.is_empty() {
            return r#"<select id="entity" name="entity"><option value="">-- Select an Entity --</option></select>"#
                .to_string();
        }

        let mut html = String::from(r#"<select id="entity" name="entity">"#);
        for option in self.options {
            let selected = if Some(option.id) == self.selected {
                " selected"
            } else {
                ""
            };
            write!(
                html,
                r#"<option value="{}"{}>{}</option>"#,
                option.id,
                selected,
                escape_html(&option.label)
            )
            .expect("write dropdown option");
        }
        html.push_str("</select>");
        html
    }
}

/// Selection form posted to `/update_data`.
#[derive(Debug, Clone)]
pub struct DashboardFilters<'a> {
    pub profile: ProfileRadio,
    pub dropdown: EntityDropdown<'a>,
}

impl<'a> DashboardFilters<'a> {
    pub fn new(kind: EntityKind, options: &'a [EntityOption], selected: Option<EntityId>) -> Self {
        Self {
            profile: ProfileRadio { selected: kind },
            dropdown: EntityDropdown { options, selected },
        }
    }
}

impl Component for DashboardFilters<'_> {
    fn render(&self) -> String {
        format!(
            r#"<form id="{form}" action="/update_data" method="POST">
<fieldset>
{radio}
<label for="entity">Select Entity:</label>
<div id="{target}">{dropdown}</div>
<button type="submit">Submit</button>
</fieldset>
</form>"#,
            form = FILTERS_FORM_ID,
            radio = self.profile.render(),
            target = ENTITY_SELECTOR_ID,
            dropdown = self.dropdown.render(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<EntityOption> {
        vec![
            EntityOption {
                label: "Ada Byron".to_string(),
                id: EntityId::new(1),
            },
            EntityOption {
                label: "Grace <Hopper>".to_string(),
                id: EntityId::new(2),
            },
        ]
    }

    #[test]
    fn radio_checks_the_selected_kind() {
        let html = ProfileRadio {
            selected: EntityKind::Team,
        }
        .render();
        assert!(html.contains(r##"value="Team" hx-get="/update_dropdown" hx-target="#entity-selector" checked"##));
        assert!(!html.contains(r##"value="Employee" hx-get="/update_dropdown" hx-target="#entity-selector" checked"##));
    }

    #[test]
    fn dropdown_marks_selection_and_escapes_labels() {
        let options = options();
        let html = EntityDropdown {
            options: &options,
            selected: Some(EntityId::new(2)),
        }
        .render();
        assert!(html.contains(r#"<option value="1">Ada Byron</option>"#));
        assert!(html.contains(r#"<option value="2" selected>Grace &lt;Hopper&gt;</option>"#));
    }

    #[test]
    fn empty_dropdown_shows_prompt() {
        let html = EntityDropdown {
            options: &[],
            selected: None,
        }
        .render();
        assert!(html.contains("-- Select an Entity --"));
    }

    #[test]
    fn form_posts_to_update_data() {
        let options = options();
        let html = DashboardFilters::new(EntityKind::Employee, &options, None).render();
        assert!(html.contains(r#"action="/update_data" method="POST""#));
        assert!(html.contains(r#"<div id="entity-selector"><select id="entity""#));
    }
}
