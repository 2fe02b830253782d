//! Height queries over a terrain surface.

/// Anything that can report terrain elevation at a world-space (x, z).
///
/// Implementations must be pure: the same coordinates always give the same
/// height, and querying never mutates shared state. Collision code is generic
/// over this trait so it can run against synthesized terrain or a hand-built
/// test surface.
pub trait HeightSource {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightSource for F
where
    F: Fn(f32, f32) -> f32,
{
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Flat ground at a fixed elevation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub elevation: f32,
}

impl FlatGround {
    pub fn new(elevation: f32) -> Self {
        Self { elevation }
    }
}

impl HeightSource for FlatGround {
    #[inline]
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.elevation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_height_sources() {
        let ramp = |x: f32, _z: f32| x * 0.5;
        assert_eq!(ramp.height_at(4.0, 100.0), 2.0);
    }

    #[test]
    fn flat_ground_ignores_position() {
        let ground = FlatGround::new(3.5);
        assert_eq!(ground.height_at(-1000.0, 42.0), 3.5);
    }
}
