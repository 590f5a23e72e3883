//! UI components using egui.

use egui::{
    Align2, Color32, Context, CornerRadius, FontId, Frame, Margin, Pos2, RichText, Sense, Stroke,
    Vec2,
};
use speakpad_core::{Notice, VoiceDescriptor};

const PANEL_WIDTH: f32 = 280.0;
const BUTTON_HEIGHT: f32 = 32.0;

const SAVE_COLOR: Color32 = Color32::from_rgb(37, 99, 235);
const LOAD_COLOR: Color32 = Color32::from_rgb(22, 163, 74);
const SPEAK_COLOR: Color32 = Color32::from_rgb(147, 51, 234);
const SELECTED_VOICE_BG: Color32 = Color32::from_rgb(208, 240, 192);
const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);

const DRAFT_INPUT_ID: &str = "draft_input";
const NOTICE_BACKDROP_ID: &str = "notice_backdrop";

/// Actions the panel reports back to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// The text input changed.
    SetDraft(String),
    /// Save the draft to storage.
    Save,
    /// Load the stored text.
    Load,
    /// Speak the loaded text.
    Speak,
    /// Pick a voice by id.
    SelectVoice(String),
    /// Close the notice modal.
    DismissNotice,
}

/// Widget-owned UI state.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Text input buffer; mirrored into the controller via `SetDraft`.
    pub draft: String,
}

/// Read-only projection of the controller for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ScreenView<'a> {
    pub persisted: &'a str,
    pub voices: &'a [VoiceDescriptor],
    /// Voice highlighted in the list (the one speaking would use).
    pub effective_voice_id: Option<&'a str>,
    pub notice: Option<&'a Notice>,
    /// Marker center in points, for its label.
    pub marker_center: Pos2,
    pub marker_label: &'a str,
}

/// Render the whole screen and return the first triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, view: &ScreenView<'_>) -> Option<UiAction> {
    render_marker_label(ctx, view);

    if let Some(notice) = view.notice {
        // The modal blocks the panel until dismissed
        render_controls(ctx, ui_state, view, false);
        return render_notice_modal(ctx, notice);
    }

    render_controls(ctx, ui_state, view, true)
}

fn panel_frame() -> Frame {
    Frame::new()
        .fill(Color32::from_rgba_premultiplied(250, 250, 252, 250))
        .corner_radius(CornerRadius::same(8))
        .stroke(Stroke::new(1.0, Color32::from_rgb(220, 220, 220)))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(12))
}

/// Full-width colored button. Returns true when clicked.
fn action_btn(ui: &mut egui::Ui, label: &str, fill: Color32) -> bool {
    let text = RichText::new(label).color(Color32::WHITE).strong();
    ui.add_sized(
        [ui.available_width(), BUTTON_HEIGHT],
        egui::Button::new(text).fill(fill).corner_radius(CornerRadius::same(5)),
    )
    .clicked()
}

fn render_controls(
    ctx: &Context,
    ui_state: &mut UiState,
    view: &ScreenView<'_>,
    enabled: bool,
) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::LEFT_TOP, Vec2::new(16.0, 16.0))
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(PANEL_WIDTH);
                ui.add_enabled_ui(enabled, |ui| {
                    ui.vertical(|ui| {
                        ui.spacing_mut().item_spacing = Vec2::new(0.0, 6.0);

                        let input = ui.add(
                            egui::TextEdit::singleline(&mut ui_state.draft)
                                .id(egui::Id::new(DRAFT_INPUT_ID))
                                .hint_text("Type something")
                                .desired_width(f32::INFINITY),
                        );
                        if input.changed() {
                            action = Some(UiAction::SetDraft(ui_state.draft.clone()));
                        }

                        if action_btn(ui, "Save to Storage", SAVE_COLOR) {
                            action = Some(UiAction::Save);
                        }
                        if action_btn(ui, "Load from Storage", LOAD_COLOR) {
                            action = Some(UiAction::Load);
                        }
                        if action_btn(ui, "Speak", SPEAK_COLOR) {
                            action = Some(UiAction::Speak);
                        }

                        ui.add_space(6.0);
                        ui.label(RichText::new("Loaded text").size(10.0).color(TEXT_MUTED));
                        if view.persisted.is_empty() {
                            ui.label(RichText::new("(nothing loaded)").italics().color(TEXT_MUTED));
                        } else {
                            ui.label(view.persisted);
                        }

                        ui.add_space(10.0);
                        ui.label(RichText::new("Select a Voice:").size(16.0).strong());
                        if let Some(id) = render_voice_list(ui, view) {
                            action = Some(UiAction::SelectVoice(id));
                        }
                    });
                });
            });
        });

    action
}

fn render_voice_list(ui: &mut egui::Ui, view: &ScreenView<'_>) -> Option<String> {
    let mut picked = None;

    if view.voices.is_empty() {
        ui.label(RichText::new("No voices found").italics().color(TEXT_MUTED));
        return None;
    }

    egui::ScrollArea::vertical()
        .max_height(200.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for voice in view.voices {
                let selected = view.effective_voice_id == Some(voice.id.as_str());
                let row = Frame::new()
                    .fill(if selected { SELECTED_VOICE_BG } else { Color32::TRANSPARENT })
                    .inner_margin(Margin::symmetric(8, 6))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(voice.label());
                    });
                if row.response.interact(Sense::click()).clicked() {
                    picked = Some(voice.id.clone());
                }
            }
        });

    picked
}

fn render_notice_modal(ctx: &Context, notice: &Notice) -> Option<UiAction> {
    let mut action = None;

    // Backdrop shares the controls' order and is kept above them
    let backdrop = egui::Area::new(egui::Id::new(NOTICE_BACKDROP_ID))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            ui.allocate_rect(screen_rect, Sense::click());
            ui.painter().rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
        });
    ctx.move_to_top(backdrop.response.layer_id);

    if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
        action = Some(UiAction::DismissNotice);
    }

    egui::Area::new(egui::Id::new("notice_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_width(320.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&notice.title).size(16.0).strong());
                    ui.add_space(8.0);
                    ui.label(&notice.message);
                    ui.add_space(12.0);
                    if ui.button("OK").clicked() {
                        action = Some(UiAction::DismissNotice);
                    }
                });
            });
        });

    action
}

/// Label drawn over the marker, which itself is painted by the scene renderer.
fn render_marker_label(ctx: &Context, view: &ScreenView<'_>) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    painter.text(
        view.marker_center,
        Align2::CENTER_CENTER,
        view.marker_label,
        FontId::proportional(14.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(voices: &'a [VoiceDescriptor], notice: Option<&'a Notice>) -> ScreenView<'a> {
        ScreenView {
            persisted: "",
            voices,
            effective_voice_id: voices.first().map(|v| v.id.as_str()),
            notice,
            marker_center: Pos2::new(400.0, 300.0),
            marker_label: "Drag me",
        }
    }

    fn run_frame(ui_state: &mut UiState, view: &ScreenView<'_>) -> Option<UiAction> {
        let ctx = Context::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, ui_state, view);
        });
        action
    }

    #[test]
    fn test_idle_frame_has_no_action() {
        let voices = vec![VoiceDescriptor::new("alva", "Alva", "sv-SE")];
        let mut ui_state = UiState::default();

        assert_eq!(run_frame(&mut ui_state, &view(&voices, None)), None);
    }

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::default(),
        }
    }

    fn run_frames(
        ctx: &Context,
        ui_state: &mut UiState,
        view: &ScreenView<'_>,
        events: Vec<egui::Event>,
    ) -> Option<UiAction> {
        let mut action = None;
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            action = render_ui(ctx, ui_state, view);
        });
        action
    }

    #[test]
    fn test_typing_emits_set_draft() {
        let ctx = Context::default();
        let mut ui_state = UiState::default();
        let view = view(&[], None);

        run_frames(&ctx, &mut ui_state, &view, Vec::new());
        ctx.memory_mut(|m| m.request_focus(egui::Id::new(DRAFT_INPUT_ID)));
        let action = run_frames(
            &ctx,
            &mut ui_state,
            &view,
            vec![egui::Event::Text("Dra maj".to_string())],
        );

        assert_eq!(action, Some(UiAction::SetDraft("Dra maj".to_string())));
        assert_eq!(ui_state.draft, "Dra maj");
    }

    #[test]
    fn test_escape_dismisses_notice() {
        let ctx = Context::default();
        let notice = Notice {
            title: "Speech".to_string(),
            message: "No available voices on this device.".to_string(),
        };
        let mut ui_state = UiState::default();
        let view = view(&[], Some(&notice));

        assert_eq!(run_frames(&ctx, &mut ui_state, &view, Vec::new()), None);
        let action = run_frames(&ctx, &mut ui_state, &view, vec![key_press(egui::Key::Escape)]);

        assert_eq!(action, Some(UiAction::DismissNotice));
    }

    #[test]
    fn test_keys_ignored_without_notice() {
        let ctx = Context::default();
        let mut ui_state = UiState::default();
        let view = view(&[], None);

        let action = run_frames(&ctx, &mut ui_state, &view, vec![key_press(egui::Key::Escape)]);

        assert_eq!(action, None);
    }

    #[test]
    fn test_notice_backdrop_covers_controls() {
        let ctx = Context::default();
        let notice = Notice {
            title: "Speech".to_string(),
            message: "No available voices on this device.".to_string(),
        };
        let mut ui_state = UiState::default();
        let view = view(&[], Some(&notice));

        for _ in 0..3 {
            run_frames(&ctx, &mut ui_state, &view, Vec::new());
        }

        // A point inside the controls panel
        let top = ctx.layer_id_at(Pos2::new(40.0, 40.0)).map(|layer| layer.id);
        assert_eq!(top, Some(egui::Id::new(NOTICE_BACKDROP_ID)));
    }

    #[test]
    fn test_notice_frame_has_no_action_without_click() {
        let notice = Notice {
            title: "Speech".to_string(),
            message: "No available voices on this device.".to_string(),
        };
        let mut ui_state = UiState::default();

        assert_eq!(run_frame(&mut ui_state, &view(&[], Some(&notice))), None);
    }
}
