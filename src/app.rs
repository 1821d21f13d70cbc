use std::time::Duration;

use crate::color::ColorTarget;
use crate::controller::SessionController;
use crate::error::EditorError;
use crate::export::{AssetDirectory, Exporter, PendingExport};
use crate::input::CanvasInput;
use crate::panels;
use crate::texture_manager::TextureManager;

/// Tabs of the "Select Base" drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseTab {
    #[default]
    Hair,
    Body,
    Background,
}

/// Message shown under the controls
#[derive(Debug, Clone)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

pub struct TraitSketchApp {
    pub(crate) controller: SessionController,
    pub(crate) exporter: Exporter,
    pub(crate) pending_exports: Vec<PendingExport>,
    pub(crate) input: CanvasInput,
    pub(crate) textures: TextureManager,
    pub(crate) show_base_drawer: bool,
    pub(crate) base_tab: BaseTab,
    /// Hex text fields of the stroke and background pickers
    pub(crate) stroke_hex: String,
    pub(crate) background_hex: String,
    pub(crate) status: Option<Status>,
}

impl TraitSketchApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: SessionController,
        exporter: Exporter,
        assets: AssetDirectory,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let colors = controller.colors();
        let status = assets.missing_notice().map(|message| {
            log::warn!("{}", message);
            Status {
                message,
                is_error: true,
            }
        });
        Self {
            controller,
            exporter,
            pending_exports: Vec::new(),
            input: CanvasInput::new(),
            textures: TextureManager::new(assets),
            // The base drawer starts open, like the first visit to the page
            show_base_drawer: true,
            base_tab: BaseTab::default(),
            stroke_hex: colors.stroke.to_hex(),
            background_hex: colors.background.to_hex(),
            status,
        }
    }

    pub(crate) fn hex_field(&mut self, target: ColorTarget) -> &mut String {
        match target {
            ColorTarget::Background => &mut self.background_hex,
            ColorTarget::Stroke => &mut self.stroke_hex,
        }
    }

    pub(crate) fn request_export(&mut self) {
        let pending = self.controller.request_export(&self.exporter);
        self.pending_exports.push(pending);
        self.status = Some(Status {
            message: "Exporting…".to_owned(),
            is_error: false,
        });
    }

    pub(crate) fn report_error(&mut self, err: &EditorError) {
        self.status = Some(Status {
            message: err.to_string(),
            is_error: true,
        });
    }

    fn poll_exports(&mut self) {
        let status = &mut self.status;
        self.pending_exports.retain_mut(|pending| match pending.poll() {
            None => true,
            Some(Ok(receipt)) => {
                *status = Some(Status {
                    message: format!("Saved {}", receipt.location),
                    is_error: false,
                });
                false
            }
            Some(Err(err)) => {
                let err = EditorError::from(err);
                log::error!("{}", err);
                *status = Some(Status {
                    message: err.to_string(),
                    is_error: true,
                });
                false
            }
        });
    }
}

impl eframe::App for TraitSketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_exports();
        if !self.pending_exports.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        panels::controls_panel(self, ctx);
        panels::base_drawer(self, ctx);
        panels::central_panel(self, ctx);
    }
}
