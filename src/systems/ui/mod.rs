use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use crate::systems::city::{CityConfig, CityStats, ClearEvent, RegenerateEvent, Seed, SizeRange};
use crate::systems::city::error::OnSceneError;

#[derive(Resource)]
pub struct GizmosVisible(pub bool);

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(GizmosVisible(false))
            .add_systems(Update, key_input)
            .add_systems(EguiPrimaryContextPass, ui_main); // UI rendering here
    }
}

// R = new seed, G = toggle block outlines
fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut gizmos_visible: ResMut<GizmosVisible>,
    mut regen_events: EventWriter<RegenerateEvent>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        regen_events.write(RegenerateEvent { seed: rand::random() });
    }
    if keyboard_input.just_pressed(KeyCode::KeyG) {
        gizmos_visible.0 = !gizmos_visible.0;
    }
}

// min/max pair for a half-open range, keeps at least one value in between
fn range_sliders(ui: &mut egui::Ui, label: &str, range: &mut SizeRange, floor: u32, ceiling: u32) -> bool {
    let mut changed = false;

    let min_limit = range.max.saturating_sub(1).max(floor);
    changed |= ui.add(egui::Slider::new(&mut range.min, floor..=min_limit)
        .text(format!("Min {label}")))
        .changed();

    let max_floor = (range.min + 1).min(ceiling);
    changed |= ui.add(egui::Slider::new(&mut range.max, max_floor..=ceiling)
        .text(format!("Max {label} (excl.)")))
        .changed();

    changed
}

fn ui_main(
    mut contexts: EguiContexts,
    current_seed: Res<Seed>,
    mut config: ResMut<CityConfig>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut clear_events: EventWriter<ClearEvent>,
    mut gizmos_visible: ResMut<GizmosVisible>,
    stats: Res<CityStats>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(200.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut regenerate = false;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");

                ui.separator();

                ui.checkbox(&mut gizmos_visible.0, "Block outlines (G)")
                    .on_hover_text("Draw block footprints and the ground extent");

                ui.separator();

                // seed
                egui::CollapsingHeader::new("Seed")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.label(format!("Current: {}", current_seed.0));
                    ui.horizontal(|ui| {
                        if ui.button("Regenerate (R)").clicked() {
                            regen_events.write(RegenerateEvent { seed: rand::random() });
                        }
                        let clear_button = egui::Button::new("Clear").fill(egui::Color32::from_rgb(130, 22, 22));
                        if ui.add(clear_button).clicked() {
                            clear_events.write(ClearEvent);
                        }
                    });
                });

                // city layout
                egui::CollapsingHeader::new("City Layout")
                    .default_open(true)
                    .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut config.block_grid_width, 0..=20)
                        .text("Blocks along X"))
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut config.block_grid_depth, 0..=20)
                        .text("Blocks along Z"))
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut config.street_padding, 0.0..=6.0)
                        .text("Street Padding"))
                        .on_hover_text("Gap between neighbouring blocks.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut config.building_padding, 0.5..=3.0)
                        .text("Building Padding"))
                        .on_hover_text("Spacing factor between buildings inside a block. Below the max building width, buildings overlap.")
                        .changed();
                });

                // block sizes
                egui::CollapsingHeader::new("Block Size")
                    .default_open(false)
                    .show(ui, |ui| {
                    regenerate |= range_sliders(ui, "Width", &mut config.block_width, 1, 10);
                    regenerate |= range_sliders(ui, "Depth", &mut config.block_depth, 1, 10);
                });

                // building sizes
                egui::CollapsingHeader::new("Buildings")
                    .default_open(true)
                    .show(ui, |ui| {
                    regenerate |= range_sliders(ui, "Width", &mut config.building.width, 1, 8);
                    regenerate |= range_sliders(ui, "Depth", &mut config.building.depth, 1, 8);
                    regenerate |= range_sliders(ui, "Height", &mut config.building.height, 1, 60);
                    regenerate |= ui.add(egui::Slider::new(&mut config.building.near_radius, 0.5..=40.0)
                        .text("Near Radius"))
                        .on_hover_text("Buildings within this distance of the origin keep their full height.")
                        .changed();

                    let mut skip = config.on_scene_error == OnSceneError::Skip;
                    if ui.checkbox(&mut skip, "Skip rejected buildings").changed() {
                        config.on_scene_error = if skip { OnSceneError::Skip } else { OnSceneError::Abort };
                        regenerate = true;
                    }
                });

                ui.separator();

                // last run
                match (&stats.layout, &stats.last_error) {
                    (Some(layout), _) => {
                        ui.label(format!("Buildings: {}", layout.buildings));
                        ui.label(format!("Blocks: {}", layout.blocks.len()));
                        ui.label(format!(
                            "Ground: {:.1} x {:.1}",
                            layout.ground.width(),
                            layout.ground.depth()
                        ));
                        if layout.skipped > 0 {
                            ui.label(format!("Skipped: {}", layout.skipped));
                        }
                    }
                    (None, Some(err)) => {
                        ui.label(egui::RichText::new(err).color(egui::Color32::from_rgb(178, 34, 34)));
                    }
                    (None, None) => {
                        ui.label("No city");
                    }
                }

                ui.separator();
                ui.label("ESC - Exit");

                // parameter edits keep the seed
                if regenerate {
                    regen_events.write(RegenerateEvent { seed: current_seed.0 });
                }
            });
    }
}
