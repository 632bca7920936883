//! Content panels: popup sections, welcome dialog, and the navbar.
//!
//! [`PanelController`] owns all section visibility state. At most one
//! section is active while the camera is focused; the "full portfolio" mode
//! shows every section at once and restarts each section's entrance fade.
//! Rendering emits [`PanelAction`]s instead of mutating app state directly,
//! so the imgui closure stays borrow-friendly and the logic stays testable.

use log::warn;

use crate::content::{portfolio_sections, SectionContent, SectionId};
use crate::interaction::easing::ease_out_cubic;

/// Entrance fade duration for section content, in seconds.
pub const ENTRANCE_FADE_SECS: f32 = 0.6;

/// Button presses surfaced to the app after the UI pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ClosePopup,
    OpenFullPortfolio,
    ToggleTheme,
    ToggleMusic,
    CloseWelcome,
}

struct SectionState {
    content: &'static SectionContent,
    visible: bool,
    active: bool,
    fade_clock: f32,
}

pub struct PanelController {
    sections: Vec<SectionState>,
    popup_open: bool,
    welcome_open: bool,
}

impl PanelController {
    pub fn new() -> Self {
        Self {
            sections: portfolio_sections()
                .iter()
                .map(|content| SectionState {
                    content,
                    visible: false,
                    active: false,
                    fade_clock: 0.0,
                })
                .collect(),
            popup_open: false,
            welcome_open: true,
        }
    }

    /// Hides every section, then shows exactly `id`, marks it active and
    /// opens the popup. The entrance fade restarts.
    pub fn show_section(&mut self, id: SectionId) {
        for section in &mut self.sections {
            let is_target = section.content.id == id;
            section.visible = is_target;
            section.active = is_target;
            if is_target {
                section.fade_clock = 0.0;
            }
        }
        self.popup_open = true;
    }

    /// String-keyed variant for config/log call sites; unknown ids are
    /// logged and ignored.
    pub fn show_section_named(&mut self, raw: &str) {
        match SectionId::from_id(raw) {
            Some(id) => self.show_section(id),
            None => warn!("Unknown section id '{raw}', ignoring"),
        }
    }

    /// Full-portfolio mode: every section visible at once, none "active",
    /// and every entrance fade restarted so the content animates in again.
    pub fn show_all(&mut self) {
        for section in &mut self.sections {
            section.visible = true;
            section.active = false;
            section.fade_clock = 0.0;
        }
        self.popup_open = true;
    }

    /// Back to the default state: nothing forced visible, nothing active.
    pub fn hide_all(&mut self) {
        for section in &mut self.sections {
            section.visible = false;
            section.active = false;
        }
    }

    /// Hides the popup immediately. Section state is restored separately
    /// once the camera reset completes.
    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn close_welcome(&mut self) {
        self.welcome_open = false;
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.sections
            .iter()
            .find(|s| s.active)
            .map(|s| s.content.id)
    }

    pub fn visible_sections(&self) -> Vec<SectionId> {
        self.sections
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.content.id)
            .collect()
    }

    /// Advances the entrance fades.
    pub fn update(&mut self, dt: f32) {
        for section in &mut self.sections {
            if section.visible {
                section.fade_clock = (section.fade_clock + dt).min(ENTRANCE_FADE_SECS);
            }
        }
    }

    /// Eased entrance alpha for a section, 0 when hidden.
    pub fn section_alpha(&self, id: SectionId) -> f32 {
        self.sections
            .iter()
            .find(|s| s.content.id == id)
            .filter(|s| s.visible)
            .map(|s| ease_out_cubic(s.fade_clock / ENTRANCE_FADE_SECS))
            .unwrap_or(0.0)
    }

    /// Builds all UI windows for this frame, pushing button presses into
    /// `actions`.
    pub fn render(&mut self, ui: &imgui::Ui, music_playing: bool, actions: &mut Vec<PanelAction>) {
        let display = ui.io().display_size;
        if display[0] <= 0.0 || display[1] <= 0.0 {
            return;
        }

        self.render_navbar(ui, music_playing, actions);

        if self.welcome_open {
            self.render_welcome(ui, display, actions);
        }

        if self.popup_open {
            self.render_popup(ui, display, actions);
        }
    }

    fn render_navbar(&self, ui: &imgui::Ui, music_playing: bool, actions: &mut Vec<PanelAction>) {
        ui.window("##navbar")
            .position([20.0, 20.0], imgui::Condition::Always)
            .size([0.0, 0.0], imgui::Condition::Always)
            .no_decoration()
            .always_auto_resize(true)
            .build(|| {
                if ui.button("Portfolio") {
                    actions.push(PanelAction::OpenFullPortfolio);
                }
                ui.same_line();
                if ui.button("Theme") {
                    actions.push(PanelAction::ToggleTheme);
                }
                ui.same_line();
                let music_label = if music_playing { "Music: on" } else { "Music: off" };
                if ui.button(music_label) {
                    actions.push(PanelAction::ToggleMusic);
                }
            });
    }

    fn render_welcome(&self, ui: &imgui::Ui, display: [f32; 2], actions: &mut Vec<PanelAction>) {
        ui.window("Welcome")
            .position(
                [display[0] * 0.5, display[1] * 0.5],
                imgui::Condition::Appearing,
            )
            .position_pivot([0.5, 0.5])
            .size([420.0, 0.0], imgui::Condition::Appearing)
            .collapsible(false)
            .resizable(false)
            .build(|| {
                ui.text_wrapped(
                    "Welcome to the showroom. Drag to orbit, scroll to zoom, \
                     and click the PC, TV, bookshelf or posters to explore.",
                );
                ui.spacing();
                if ui.button("Let's go") {
                    actions.push(PanelAction::CloseWelcome);
                }
            });
    }

    fn render_popup(&mut self, ui: &imgui::Ui, display: [f32; 2], actions: &mut Vec<PanelAction>) {
        let panel_width = (display[0] * 0.35).clamp(360.0, 560.0);
        let panel_height = display[1] * 0.8;

        ui.window("##popup")
            .position(
                [display[0] - panel_width - 20.0, display[1] * 0.1],
                imgui::Condition::Always,
            )
            .size([panel_width, panel_height], imgui::Condition::Always)
            .title_bar(false)
            .resizable(false)
            .build(|| {
                if ui.button("Close") {
                    actions.push(PanelAction::ClosePopup);
                }
                ui.separator();

                for section in &self.sections {
                    if !section.visible {
                        continue;
                    }
                    let alpha = ease_out_cubic(section.fade_clock / ENTRANCE_FADE_SECS);
                    let _alpha_token = ui.push_style_var(imgui::StyleVar::Alpha(alpha));

                    ui.spacing();
                    ui.text(section.content.title);
                    ui.separator();
                    for paragraph in section.content.body {
                        ui.text_wrapped(paragraph);
                        ui.spacing();
                    }
                }
            });
    }
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_section_leaves_exactly_one_visible_and_active() {
        let mut panels = PanelController::new();
        panels.show_section(SectionId::Skills);
        panels.show_section(SectionId::Projects);

        assert_eq!(panels.visible_sections(), vec![SectionId::Projects]);
        assert_eq!(panels.active_section(), Some(SectionId::Projects));
        assert!(panels.is_popup_open());
    }

    #[test]
    fn unknown_section_name_is_a_logged_no_op() {
        let mut panels = PanelController::new();
        panels.show_section_named("skills");
        assert_eq!(panels.active_section(), Some(SectionId::Skills));

        panels.show_section_named("blog");
        // Unchanged.
        assert_eq!(panels.active_section(), Some(SectionId::Skills));
        assert_eq!(panels.visible_sections(), vec![SectionId::Skills]);
    }

    #[test]
    fn show_all_then_hide_all_restores_the_default() {
        let mut panels = PanelController::new();
        panels.show_all();
        assert_eq!(panels.visible_sections().len(), SectionId::ALL.len());
        assert_eq!(panels.active_section(), None);

        panels.hide_all();
        assert!(panels.visible_sections().is_empty());
        assert_eq!(panels.active_section(), None);
    }

    #[test]
    fn entrance_fade_restarts_on_every_show_all() {
        let mut panels = PanelController::new();
        panels.show_all();
        panels.update(ENTRANCE_FADE_SECS);
        assert_eq!(panels.section_alpha(SectionId::AboutMe), 1.0);

        panels.show_all();
        assert_eq!(panels.section_alpha(SectionId::AboutMe), 0.0);
        panels.update(ENTRANCE_FADE_SECS * 0.5);
        let alpha = panels.section_alpha(SectionId::AboutMe);
        assert!(alpha > 0.0 && alpha < 1.0);
    }

    #[test]
    fn hidden_sections_do_not_fade() {
        let mut panels = PanelController::new();
        panels.update(1.0);
        assert_eq!(panels.section_alpha(SectionId::Contact), 0.0);
    }

    #[test]
    fn closing_the_popup_keeps_section_state_until_hide_all() {
        let mut panels = PanelController::new();
        panels.show_section(SectionId::Education);
        panels.close_popup();
        assert!(!panels.is_popup_open());
        // The section stays visible while the camera animates back.
        assert_eq!(panels.visible_sections(), vec![SectionId::Education]);
        panels.hide_all();
        assert!(panels.visible_sections().is_empty());
    }
}
