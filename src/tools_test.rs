use super::*;

const ALL_TOOLS: [Tool; 9] = [
    Tool::Select,
    Tool::Drag,
    Tool::Modify,
    Tool::Transform,
    Tool::Duplicate,
    Tool::Draw(ShapeKind::Polygon),
    Tool::Draw(ShapeKind::Rectangle),
    Tool::Delete,
    Tool::ZoomBox,
];

// =============================================================
// Activation
// =============================================================

#[test]
fn rail_starts_idle() {
    let rail = ToolRail::new();
    assert_eq!(rail.active(), None);
}

#[test]
fn first_activation_has_nothing_to_deactivate() {
    let mut rail = ToolRail::new();
    let change = rail.activate(Tool::Modify);
    assert_eq!(change, ToolChange { deactivate: None, activate: Some(Tool::Modify) });
    assert_eq!(rail.active(), Some(Tool::Modify));
}

#[test]
fn switching_deactivates_previous_then_activates_next() {
    for a in ALL_TOOLS {
        for b in ALL_TOOLS {
            if a == b {
                continue;
            }
            let mut rail = ToolRail::new();
            rail.activate(a);
            let change = rail.activate(b);
            assert_eq!(change, ToolChange { deactivate: Some(a), activate: Some(b) });
            assert_eq!(rail.active(), Some(b));
        }
    }
}

#[test]
fn reactivating_active_tool_is_idempotent() {
    for tool in ALL_TOOLS {
        let mut rail = ToolRail::new();
        rail.activate(tool);
        let change = rail.activate(tool);
        assert!(change.is_noop());
        assert_eq!(rail.active(), Some(tool));
    }
}

// =============================================================
// Deactivation and default
// =============================================================

#[test]
fn deactivate_current_returns_to_idle() {
    let mut rail = ToolRail::new();
    rail.activate(Tool::ZoomBox);
    let change = rail.deactivate_current();
    assert_eq!(change, ToolChange { deactivate: Some(Tool::ZoomBox), activate: None });
    assert_eq!(rail.active(), None);
}

#[test]
fn deactivate_when_idle_is_a_noop() {
    let mut rail = ToolRail::new();
    assert!(rail.deactivate_current().is_noop());
}

#[test]
fn activate_default_arms_the_drag_tool() {
    let mut rail = ToolRail::new();
    rail.activate(Tool::Delete);
    let change = rail.activate_default();
    assert_eq!(change.activate, Some(Tool::Drag));
    assert_eq!(rail.active(), Some(Tool::Drag));
}

#[test]
fn activate_default_while_default_active_is_a_noop() {
    let mut rail = ToolRail::new();
    rail.activate_default();
    assert!(rail.activate_default().is_noop());
}

// =============================================================
// Tool helpers
// =============================================================

#[test]
fn only_draw_tools_create_shapes() {
    for tool in ALL_TOOLS {
        assert_eq!(tool.is_draw(), matches!(tool, Tool::Draw(_)));
    }
}
