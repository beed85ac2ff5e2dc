use crate::theme::{ParticleKind, Theme};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One sealed answer, drawn as a stone or feather on the pile.
/// Offsets are in pixels relative to the pile's anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryParticle {
    pub id: usize,
    pub kind: ParticleKind,
    pub left: f64,
    pub bottom: f64,
    pub rotation: f64,
    pub scale: f64,
    pub color: String,
    /// Corner radii in percent, stones only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<[u8; 4]>,
}

/// Cosmetic heap that grows by one particle per accepted answer and narrows
/// towards the top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPile {
    particles: Vec<MemoryParticle>,
}

impl MemoryPile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, theme: &Theme) -> &MemoryParticle {
        self.push_with(theme, &mut rand::thread_rng())
    }

    pub fn push_with<R: Rng + ?Sized>(&mut self, theme: &Theme, rng: &mut R) -> &MemoryParticle {
        let index = self.particles.len();
        #[allow(clippy::cast_precision_loss)]
        let height = index as f64 * 6.0;
        let spread = 120_usize.saturating_sub(index * 4).max(20);
        #[allow(clippy::cast_precision_loss)]
        let spread = spread as f64;

        let border_radius = match theme.particle_kind {
            ParticleKind::Stone => Some([(); 4].map(|()| rng.gen_range(30..70))),
            ParticleKind::Feather => None,
        };

        self.particles.push(MemoryParticle {
            id: index,
            kind: theme.particle_kind,
            left: (rng.gen::<f64>() - 0.5) * spread,
            bottom: height + rng.gen::<f64>() * 10.0,
            rotation: rng.gen::<f64>() * 360.0,
            scale: 0.8 + rng.gen::<f64>() * 0.4,
            color: theme.particle_color.clone(),
            border_radius,
        });
        &self.particles[index]
    }

    #[must_use]
    pub fn particles(&self) -> &[MemoryParticle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn theme(id: &str) -> Theme {
        Theme::find(id).unwrap()
    }

    #[test]
    fn particles_stay_within_the_narrowing_pile() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pile = MemoryPile::new();
        let stoic = theme("stoic");

        for i in 0..30 {
            let particle = pile.push_with(&stoic, &mut rng).clone();
            let spread = f64::from(120_u32.saturating_sub(i * 4).max(20));
            let height = f64::from(i) * 6.0;
            assert!(particle.left.abs() <= spread / 2.0);
            assert!(particle.bottom >= height && particle.bottom < height + 10.0);
            assert!((0.0..360.0).contains(&particle.rotation));
            assert!((0.8..1.2).contains(&particle.scale));
            let radii = particle.border_radius.unwrap();
            assert!(radii.iter().all(|r| (30..70).contains(r)));
        }
        assert_eq!(pile.len(), 30);
    }

    #[test]
    fn feathers_have_no_corner_radii() {
        let mut pile = MemoryPile::new();
        let particle = pile.push(&theme("serene"));
        assert_eq!(particle.kind, ParticleKind::Feather);
        assert_eq!(particle.border_radius, None);
        assert_eq!(particle.color, "rgba(142, 154, 175, 0.6)");
    }
}
