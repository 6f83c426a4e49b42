//! JSON command protocol for scripted control of the viewer.

use serde::{Deserialize, Serialize};
use shared::ColorValue;

use crate::binder::{is_garment, SyncOutcome};
use crate::harness::TestHarness;

fn one() -> u32 {
    1
}

/// A command an external driver can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ViewerCommand {
    /// Change the color being edited
    EditColor { color: ColorValue },
    /// Commit the edited color to the garment
    ApplyColor,
    /// Stop the clip and spin the model
    EnableRotation,
    /// Stop spinning and replay the clip
    DisableRotation,
    /// Run frame ticks
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
    /// Advance clip playback
    Advance { seconds: f32 },
    /// Inspect viewer state and meshes
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn outcome_json(outcome: SyncOutcome) -> serde_json::Value {
    serde_json::json!({
        "recolored": outcome.recolored,
        "transition": outcome.transition,
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: ViewerCommand) -> CommandResponse {
    match cmd {
        ViewerCommand::EditColor { color } => {
            harness.edit_color(color);
            CommandResponse::ok_with_data(serde_json::json!({ "pending_color": color }))
        }

        ViewerCommand::ApplyColor => CommandResponse::ok_with_data(outcome_json(harness.apply_color())),

        ViewerCommand::EnableRotation => {
            CommandResponse::ok_with_data(outcome_json(harness.enable_rotation()))
        }

        ViewerCommand::DisableRotation => {
            CommandResponse::ok_with_data(outcome_json(harness.disable_rotation()))
        }

        ViewerCommand::Tick { count } => {
            let rotated = harness.tick(count);
            CommandResponse::ok_with_data(serde_json::json!({
                "rotated": rotated,
                "rotation_y": harness.rotation_y(),
            }))
        }

        ViewerCommand::Advance { seconds } => {
            if !seconds.is_finite() || seconds < 0.0 {
                return CommandResponse::err(format!("Invalid advance duration: {seconds}"));
            }
            harness.advance(seconds);
            CommandResponse::ok()
        }

        ViewerCommand::Inspect => {
            let meshes: Vec<serde_json::Value> = harness
                .controller
                .model()
                .map(|model| {
                    let scene = &model.scene;
                    scene
                        .mesh_nodes()
                        .into_iter()
                        .filter_map(|id| scene.node(id).map(|node| (id, node)))
                        .map(|(id, node)| {
                            let material = scene.mesh_material(id);
                            let material_name = material.and_then(|m| m.name.as_deref());
                            serde_json::json!({
                                "name": node.name,
                                "material": material_name,
                                "color": material.map(|m| m.color),
                                "garment": material.is_some()
                                    && is_garment(&node.name, material_name),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            CommandResponse::ok_with_data(serde_json::json!({
                "viewer": harness.snapshot(),
                "mesh_count": meshes.len(),
                "meshes": meshes,
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: ViewerCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<ViewerCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
