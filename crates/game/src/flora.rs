//! Vegetation bend: movers brushing past and wind push plants, springs pull them back.

use engine_core::Body;
use procgen::{SpringParams, Vegetation};

/// Bend impulse per px/frame of mover velocity.
pub const BRUSH_FORCE: f32 = 0.02;
/// Bend impulse per unit of wind per frame.
pub const WIND_FORCE: f32 = 0.004;

fn touches(plant: &Vegetation, body: &Body) -> bool {
    let dx = (body.center().x - plant.x).abs();
    dx <= plant.reach() && body.bottom() >= plant.top_y() && body.position.y <= plant.base_y
}

/// Push every plant from the movers touching it and the wind, then step its spring.
pub fn update_vegetation<'a>(
    plants: &mut [Vegetation],
    movers: impl Iterator<Item = &'a Body> + Clone,
    wind: f32,
    params: SpringParams,
    dt: f32,
) {
    for plant in plants.iter_mut() {
        let brush: f32 = movers
            .clone()
            .filter(|body| touches(plant, body))
            .map(|body| body.velocity.x * BRUSH_FORCE)
            .sum();
        // Titans barely notice a passer-by.
        let scale = if plant.titan { 0.3 } else { 1.0 };
        plant.apply_force(brush * scale * dt + wind * WIND_FORCE * dt);
        plant.step(params, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use procgen::{FoliageShape, StemShape};

    fn plant(x: f32) -> Vegetation {
        Vegetation {
            x,
            base_y: 400.0,
            height: 60.0,
            width: 20.0,
            stem: StemShape::Straight,
            foliage: FoliageShape::Frond,
            stem_color: [0.3, 0.4, 0.2],
            foliage_color: [0.3, 0.6, 0.2],
            sway_speed: 0.02,
            sway_amount: 0.05,
            sway_phase: 0.0,
            titan: false,
            bend: 0.0,
            bend_velocity: 0.0,
        }
    }

    #[test]
    fn passing_mover_bends_plant_which_then_settles() {
        let mut plants = vec![plant(100.0), plant(1000.0)];
        let mut runner = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 34.0));
        runner.velocity.x = 5.0;
        let movers = [runner];
        update_vegetation(&mut plants, movers.iter(), 0.0, SpringParams::default(), 1.0);
        assert!(plants[0].bend > 0.0);
        assert_eq!(plants[1].bend, 0.0);

        let nobody: [Body; 0] = [];
        for _ in 0..600 {
            update_vegetation(&mut plants, nobody.iter(), 0.0, SpringParams::default(), 1.0);
        }
        assert!(plants[0].bend.abs() < 1e-3);
    }

    #[test]
    fn wind_leans_plants_downwind() {
        let mut plants = vec![plant(100.0)];
        let nobody: [Body; 0] = [];
        for _ in 0..30 {
            update_vegetation(&mut plants, nobody.iter(), -2.0, SpringParams::default(), 1.0);
        }
        assert!(plants[0].bend < 0.0);
    }
}
