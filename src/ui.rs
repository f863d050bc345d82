use egui::Context;

use crate::controller::Game;
use crate::view::render::HudFrame;

/// Build the HUD and return egui output
pub fn build_hud(egui_ctx: &Context, raw_input: egui::RawInput, game: &Game, fps: f32) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_status_window(ctx, game, fps);
        draw_controls(ctx);
    })
}

/// Tessellate egui output into something the renderer can paint
pub fn into_hud_frame(egui_ctx: &Context, output: egui::FullOutput) -> HudFrame {
    let pixels_per_point = output.pixels_per_point;
    HudFrame {
        primitives: egui_ctx.tessellate(output.shapes, pixels_per_point),
        textures_delta: output.textures_delta,
        pixels_per_point,
    }
}

fn bomb_label(game: &Game) -> String {
    if game.bomb.dropping {
        format!("Bomb: falling, depth {:.0}", game.bomb_depth())
    } else {
        "Bomb: ready".to_string()
    }
}

fn explosion_label(game: &Game) -> String {
    match game.explosion.progress() {
        Some(p) => format!("Explosion: {p}/{}", game.config.explosion_terminal),
        None => "Explosion: -".to_string(),
    }
}

fn draw_status_window(ctx: &Context, game: &Game, fps: f32) {
    egui::Window::new("Status")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {fps:.0}")).small());
            ui.label(egui::RichText::new(format!("Frame: {}", game.frame)).small());
            ui.label(egui::RichText::new(format!("Submarine x: {:.0}", game.submarine_x())).small());
            ui.label(egui::RichText::new(format!("Shooter x: {:.0}", game.shooter_x())).small());
            ui.label(egui::RichText::new(bomb_label(game)).small());
            ui.label(egui::RichText::new(explosion_label(game)).small());
        });
}

fn draw_controls(ctx: &Context) {
    egui::Area::new(egui::Id::new("controls"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -8.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("Left/A - move   Right/D - move   Space/Down - drop bomb")
                    .small()
                    .color(egui::Color32::WHITE),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Action;

    #[test]
    fn test_labels_follow_game_state() {
        let mut game = Game::default();
        assert_eq!(bomb_label(&game), "Bomb: ready");
        assert_eq!(explosion_label(&game), "Explosion: -");

        game.apply(Action::DropBomb);
        game.tick();
        assert_eq!(bomb_label(&game), "Bomb: falling, depth 1");
    }

    #[test]
    fn test_hud_builds_headless() {
        let ctx = Context::default();
        let game = Game::default();
        let output = build_hud(&ctx, egui::RawInput::default(), &game, 60.0);
        let frame = into_hud_frame(&ctx, output);
        assert!(frame.pixels_per_point > 0.0);
    }
}
