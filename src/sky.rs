// Copyright (c) 2026 rezky_nightky

use rand::distr::{Distribution, Uniform};
use rand::Rng;

/// Vertical position (percent of view height) past which a particle is
/// recycled to `RESPAWN_Y`. Strictly greater-than: a particle landing
/// exactly on the bound stays put for one more tick.
pub const DRIFT_FLOOR: f32 = 110.0;
pub const RESPAWN_Y: f32 = -10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Cloud,
    Leaf,
    Dust,
}

impl Kind {
    /// Spawn band for the initial vertical position. Clouds hang near
    /// the top of the view, leaves and dust fill the whole of it.
    fn y_range(self) -> (f32, f32) {
        match self {
            Kind::Cloud => (0.0, 30.0),
            Kind::Leaf | Kind::Dust => (0.0, 100.0),
        }
    }

    fn size_range(self) -> (f32, f32) {
        match self {
            Kind::Cloud => (30.0, 80.0),
            Kind::Leaf => (5.0, 20.0),
            Kind::Dust => (2.0, 7.0),
        }
    }

    /// Percent of view height per tick.
    fn speed_range(self) -> (f32, f32) {
        match self {
            Kind::Cloud => (0.01, 0.03),
            Kind::Leaf => (0.05, 0.15),
            Kind::Dust => (0.02, 0.10),
        }
    }

    /// Degrees per tick.
    fn spin_range(self) -> (f32, f32) {
        match self {
            Kind::Cloud => (0.01, 0.06),
            Kind::Leaf => (0.1, 0.6),
            Kind::Dust => (0.2, 1.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    pub kind: Kind,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Particle {
    /// One drift tick: sink by `speed`, recycle past the floor, keep
    /// rotation inside [0, 360). `x` and `size` never change after
    /// generation.
    pub fn step(&mut self) {
        self.y += self.speed;
        if self.y > DRIFT_FLOOR {
            self.y = RESPAWN_Y;
        }
        self.rotation = (self.rotation + self.rotation_speed) % 360.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnCounts {
    pub clouds: u16,
    pub leaves: u16,
    pub dust: u16,
}

impl SpawnCounts {
    pub fn total(self) -> usize {
        self.clouds as usize + self.leaves as usize + self.dust as usize
    }
}

impl Default for SpawnCounts {
    fn default() -> Self {
        Self {
            clouds: 5,
            leaves: 10,
            dust: 15,
        }
    }
}

/// Generate the full population: the category blocks in order, ids
/// counting up from 0. Ids are unique within one population only; a
/// fresh call starts over at 0.
pub fn generate_population<R: Rng + ?Sized>(counts: SpawnCounts, rng: &mut R) -> Vec<Particle> {
    let mut out = Vec::with_capacity(counts.total());
    let mut id: u32 = 0;

    let rand_x = Uniform::new(0.0f32, 100.0).expect("valid range");
    let rand_rotation = Uniform::new(0.0f32, 360.0).expect("valid range");

    let blocks = [
        (Kind::Cloud, counts.clouds),
        (Kind::Leaf, counts.leaves),
        (Kind::Dust, counts.dust),
    ];

    for (kind, n) in blocks {
        let (y_lo, y_hi) = kind.y_range();
        let (sz_lo, sz_hi) = kind.size_range();
        let (sp_lo, sp_hi) = kind.speed_range();
        let (rs_lo, rs_hi) = kind.spin_range();

        let rand_y = Uniform::new(y_lo, y_hi).expect("valid range");
        let rand_size = Uniform::new(sz_lo, sz_hi).expect("valid range");
        let rand_speed = Uniform::new(sp_lo, sp_hi).expect("valid range");
        let rand_spin = Uniform::new(rs_lo, rs_hi).expect("valid range");

        for _ in 0..n {
            out.push(Particle {
                id,
                x: rand_x.sample(rng),
                y: rand_y.sample(rng),
                size: rand_size.sample(rng),
                speed: rand_speed.sample(rng),
                kind,
                rotation: rand_rotation.sample(rng),
                rotation_speed: rand_spin.sample(rng),
            });
            id += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn sample_population() -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(0xD1F7);
        generate_population(SpawnCounts::default(), &mut rng)
    }

    #[test]
    fn default_counts_per_category() {
        let pop = sample_population();
        let count = |k| pop.iter().filter(|p| p.kind == k).count();
        assert_eq!(count(Kind::Cloud), 5);
        assert_eq!(count(Kind::Leaf), 10);
        assert_eq!(count(Kind::Dust), 15);
        assert_eq!(pop.len(), 30);
    }

    #[test]
    fn ids_count_up_from_zero_in_category_block_order() {
        let pop = sample_population();
        for (i, p) in pop.iter().enumerate() {
            assert_eq!(p.id, i as u32);
        }
        assert!(pop[..5].iter().all(|p| p.kind == Kind::Cloud));
        assert!(pop[5..15].iter().all(|p| p.kind == Kind::Leaf));
        assert!(pop[15..].iter().all(|p| p.kind == Kind::Dust));
    }

    #[test]
    fn ids_restart_per_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_population(SpawnCounts::default(), &mut rng);
        let b = generate_population(SpawnCounts::default(), &mut rng);
        assert_eq!(a[0].id, 0);
        assert_eq!(b[0].id, 0);
        assert_eq!(a.last().unwrap().id, b.last().unwrap().id);
    }

    #[test]
    fn attributes_stay_inside_category_ranges() {
        for seed in 0..8u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for p in generate_population(SpawnCounts::default(), &mut rng) {
                let in_range = |v: f32, (lo, hi): (f32, f32)| v >= lo && v < hi;
                assert!(in_range(p.x, (0.0, 100.0)), "x {}", p.x);
                assert!(in_range(p.rotation, (0.0, 360.0)), "rotation {}", p.rotation);
                assert!(in_range(p.y, p.kind.y_range()), "y {} for {:?}", p.y, p.kind);
                assert!(in_range(p.size, p.kind.size_range()));
                assert!(in_range(p.speed, p.kind.speed_range()));
                assert!(in_range(p.rotation_speed, p.kind.spin_range()));
            }
        }
    }

    #[test]
    fn custom_counts_are_honored() {
        let mut rng = StdRng::seed_from_u64(7);
        let counts = SpawnCounts {
            clouds: 0,
            leaves: 3,
            dust: 1,
        };
        let pop = generate_population(counts, &mut rng);
        assert_eq!(pop.len(), 4);
        assert!(pop.iter().all(|p| p.kind != Kind::Cloud));
    }

    #[test]
    fn step_recycles_past_the_floor_to_respawn_height() {
        let mut p = Particle {
            id: 0,
            x: 40.0,
            y: 105.0,
            size: 3.0,
            speed: 8.0,
            kind: Kind::Dust,
            rotation: 350.0,
            rotation_speed: 20.0,
        };
        p.step();
        assert_eq!(p.y, RESPAWN_Y);
        assert_eq!(p.rotation, 10.0);
        assert_eq!(p.x, 40.0);
        assert_eq!(p.size, 3.0);
    }

    #[test]
    fn step_advances_exactly_by_speed_below_the_floor() {
        let mut p = Particle {
            id: 1,
            x: 10.0,
            y: 50.0,
            size: 12.0,
            speed: 0.1,
            kind: Kind::Leaf,
            rotation: 10.0,
            rotation_speed: 0.5,
        };
        p.step();
        assert_eq!(p.y, 50.0 + 0.1);
        assert_eq!(p.rotation, 10.0 + 0.5);
    }

    #[test]
    fn landing_exactly_on_the_floor_does_not_recycle() {
        let mut p = Particle {
            id: 2,
            x: 0.0,
            y: 109.0,
            size: 5.0,
            speed: 1.0,
            kind: Kind::Leaf,
            rotation: 0.0,
            rotation_speed: 0.0,
        };
        p.step();
        assert_eq!(p.y, DRIFT_FLOOR);
        p.step();
        assert_eq!(p.y, RESPAWN_Y);
    }

    #[test]
    fn rotation_stays_normalized_over_many_ticks() {
        let mut pop = sample_population();
        for _ in 0..2000 {
            for p in &mut pop {
                p.step();
                assert!(p.rotation >= 0.0 && p.rotation < 360.0);
            }
        }
    }
}
