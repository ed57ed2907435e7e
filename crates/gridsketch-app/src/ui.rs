//! UI components using egui.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, RichText, Stroke, Vec2};
use gridsketch_core::{EditorState, GridMode};

use crate::shortcuts::ShortcutRegistry;

const TEXT_MUTED: Color32 = Color32::from_gray(120);
const TEXT: Color32 = Color32::from_gray(60);

/// UI state that persists between frames.
#[derive(Debug, Default)]
pub struct UiState {
    /// Contents of the length field.
    pub length_input: String,
    /// Selection the length field was last filled from: (line index, length).
    synced: Option<(usize, i64)>,
    pub shortcuts_open: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill the length field when the selection or its length changes.
    /// Leaves the field alone while the user is typing into it.
    pub fn sync_selection(&mut self, state: &EditorState) {
        let current = state
            .interaction
            .selected_line
            .zip(state.interaction.selected_length_mm);
        if current != self.synced {
            self.synced = current;
            self.length_input = current.map(|(_, mm)| mm.to_string()).unwrap_or_default();
        }
    }
}

/// Actions triggered by UI interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ToggleGrid,
    ToggleFineGrid,
    ToggleLabels,
    ResetView,
    ZoomIn,
    ZoomOut,
    /// Apply the typed length to the selected line.
    SetLength(String),
    Export,
    Import,
    Clear,
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(Color32::from_rgba_unmultiplied(250, 250, 252, 250))
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, Color32::from_gray(220)))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [0, 2],
            color: Color32::from_black_alpha(10),
        })
        .inner_margin(Margin::symmetric(12, 6))
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(TEXT_MUTED));
}

/// Render all UI and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, state: &EditorState) -> Option<UiAction> {
    ui_state.sync_selection(state);

    let status_action = render_status_panel(ctx, ui_state, state);
    let view_action = render_view_toolbar(ctx, state);
    if ui_state.shortcuts_open {
        render_shortcuts_panel(ctx, ui_state);
    }

    status_action.or(view_action)
}

/// Top-left panel: mode, counts, the length field and file actions.
fn render_status_panel(ctx: &Context, ui_state: &mut UiState, state: &EditorState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("status_panel"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(6.0, 4.0);

                    ui.horizontal(|ui| {
                        section_label(ui, "MODE");
                        ui.label(RichText::new(state.phase().label()).strong().color(TEXT));
                    });
                    ui.horizontal(|ui| {
                        section_label(ui, "LINES");
                        ui.label(RichText::new(state.lines.len().to_string()).color(TEXT));
                    });
                    if let Some(mm) = state.interaction.live_length_mm {
                        ui.horizontal(|ui| {
                            section_label(ui, "LENGTH");
                            ui.label(RichText::new(format!("{} mm", mm)).color(TEXT));
                        });
                    }

                    if state.interaction.selected_line.is_some() {
                        ui.separator();
                        section_label(ui, "SELECTED LENGTH (mm)");
                        ui.horizontal(|ui| {
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut ui_state.length_input)
                                    .desired_width(80.0),
                            );
                            let submitted = response.lost_focus()
                                && ui.input(|i| i.key_pressed(egui::Key::Enter));
                            if submitted || ui.button("Apply").clicked() {
                                action = Some(UiAction::SetLength(ui_state.length_input.clone()));
                            }
                        });
                    }

                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("Export").on_hover_text("Save lines to a file").clicked() {
                            action = Some(UiAction::Export);
                        }
                        if ui.button("Import").on_hover_text("Replace lines from a file").clicked() {
                            action = Some(UiAction::Import);
                        }
                        if ui.button("Clear").on_hover_text("Remove all lines").clicked() {
                            action = Some(UiAction::Clear);
                        }
                    });
                    if ui
                        .small_button(if ui_state.shortcuts_open { "Hide shortcuts" } else { "Shortcuts" })
                        .clicked()
                    {
                        ui_state.shortcuts_open = !ui_state.shortcuts_open;
                    }
                });
            });
        });

    action
}

/// Bottom-left toolbar with grid toggles and zoom controls.
fn render_view_toolbar(ctx: &Context, state: &EditorState) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("view_toolbar"))
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(4.0, 0.0);

                    let mut grid = state.view.show_grid;
                    if ui.checkbox(&mut grid, "Grid").changed() {
                        action = Some(UiAction::ToggleGrid);
                    }
                    let mut fine = state.view.grid_mode == GridMode::Fine;
                    if ui.checkbox(&mut fine, "Fine").changed() {
                        action = Some(UiAction::ToggleFineGrid);
                    }
                    let mut labels = state.view.show_labels;
                    if ui.checkbox(&mut labels, "Labels").changed() {
                        action = Some(UiAction::ToggleLabels);
                    }

                    ui.separator();

                    if ui.button("−").on_hover_text("Zoom out").clicked() {
                        action = Some(UiAction::ZoomOut);
                    }
                    let zoom_pct = (state.view.camera.zoom * 100.0).round() as i32;
                    if ui
                        .button(RichText::new(format!("{}%", zoom_pct)).color(TEXT))
                        .on_hover_text("Reset view (0)")
                        .clicked()
                    {
                        action = Some(UiAction::ResetView);
                    }
                    if ui.button("+").on_hover_text("Zoom in").clicked() {
                        action = Some(UiAction::ZoomIn);
                    }
                });
            });
        });

    action
}

fn render_shortcuts_panel(ctx: &Context, ui_state: &mut UiState) {
    egui::Area::new(egui::Id::new("shortcuts_panel"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(320.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Shortcuts").size(14.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            ui_state.shortcuts_open = false;
                        }
                    });
                });
                ui.add_space(6.0);
                for shortcut in ShortcutRegistry::all() {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(shortcut.format())
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(Color32::from_rgb(100, 116, 139)),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(shortcut.description).size(12.0).color(TEXT));
                        });
                    });
                }
            });
        });
}
