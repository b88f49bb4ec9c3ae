//! Translation of simulation frames into rendering scenes.

use glam::Vec2;
use prowl_core::{AgentId, TileGrid};
use prowl_rendering::{AgentPresentation, Color, Scene, TileLayer, TilePalette};
use prowl_simulation::{AgentFrame, Frame};

/// Background shown outside the map.
pub(crate) const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 24, 20);

const PLAYER_COLOR: Color = Color::from_rgb_u8(70, 110, 220);
const WOLF_COLOR: Color = Color::from_rgb_u8(130, 130, 140);

/// Builds the initial scene for `frame` over `grid`.
pub(crate) fn build_scene(frame: &Frame, grid: &TileGrid, palette: &TilePalette) -> Scene {
    let mut scene = Scene::new(TileLayer::from_grid(grid, palette), Vec2::ZERO, Vec::new());
    populate_scene(frame, &mut scene);
    scene
}

/// Copies camera and agent state from `frame` into `scene`.
pub(crate) fn populate_scene(frame: &Frame, scene: &mut Scene) {
    scene.camera_offset = frame.camera_offset;
    scene.agents.clear();
    scene.agents.push(present(AgentId::Wolf, &frame.wolf, WOLF_COLOR));
    scene
        .agents
        .push(present(AgentId::Player, &frame.player, PLAYER_COLOR));
}

fn present(id: AgentId, agent: &AgentFrame, color: Color) -> AgentPresentation {
    let position = agent.snapshot.position;
    AgentPresentation::new(
        id,
        Vec2::new(position.x(), position.y()),
        agent.animation.direction,
        agent.animation.frame_index,
        color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use prowl_core::{Direction, Position, TileCode, Walkability};
    use prowl_simulation::{Simulation, SimulationConfig};
    use prowl_system_animation::AnimationTuning;
    use prowl_system_player::PlayerMotion;
    use prowl_system_wolf::WolfTuning;
    use std::collections::BTreeSet;

    fn simulation() -> Simulation {
        let grid = TileGrid::from_rows(
            vec![vec![TileCode::new(1); 12]; 10],
            32,
            Walkability::Blocking(BTreeSet::from([TileCode::new(0)])),
        )
        .expect("valid grid");
        let config = SimulationConfig {
            player_spawn: Position::new(64.0, 64.0),
            wolf_spawn: Position::new(320.0, 256.0),
            player_motion: PlayerMotion::default(),
            wolf: WolfTuning::default(),
            animation: AnimationTuning::default(),
            viewport: Default::default(),
            seed: 3,
        };
        Simulation::new(grid, &config)
    }

    #[test]
    fn scene_tracks_camera_and_draws_player_last() {
        let mut simulation = simulation();
        simulation.step(Some(Direction::Right));

        let scene = build_scene(
            &simulation.frame(),
            simulation.tile_grid(),
            &TilePalette::default(),
        );

        assert_eq!(scene.camera_offset, Vec2::new(68.0 - 320.0, 64.0 - 240.0));
        assert_eq!(scene.agents.len(), 2);
        let player = scene.agents[1];
        assert_eq!(player.id, AgentId::Player);
        assert_eq!(player.position, Vec2::new(68.0, 64.0));
        assert!(player.facing_flip);
        assert_eq!(scene.tiles.columns, 12);
    }

    #[test]
    fn populate_replaces_previous_agents() {
        let mut simulation = simulation();
        let mut scene = build_scene(
            &simulation.frame(),
            simulation.tile_grid(),
            &TilePalette::default(),
        );

        simulation.step(Some(Direction::Down));
        populate_scene(&simulation.frame(), &mut scene);

        assert_eq!(scene.agents.len(), 2);
        assert_eq!(scene.agents[1].position, Vec2::new(64.0, 68.0));
        assert_eq!(scene.agents[1].direction, Direction::Down);
    }
}
