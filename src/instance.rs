//! Per-tick agent snapshot for renderers.
//!
//! The simulation does no drawing. After each tick a renderer can pull an
//! [`AgentInstance`] per agent and upload the slice as-is: the layout is
//! `#[repr(C)]`, 16-byte aligned per vector, and `bytemuck::Pod`.

use crate::agent::Agent;
use bytemuck::{Pod, Zeroable};

/// GPU-friendly view of one agent.
///
/// Layout (48 bytes):
///
/// | Offset | Field | Type |
/// |--------|-------|------|
/// | 0 | `position` | `vec3<f32>` |
/// | 12 | `speed` | `f32` |
/// | 16 | `velocity` | `vec3<f32>` |
/// | 28 | padding | `f32` |
/// | 32 | `color` | `vec4<f32>` |
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct AgentInstance {
    /// World position.
    pub position: [f32; 3],
    /// Length of `velocity`.
    pub speed: f32,
    /// Velocity (heading times speed).
    pub velocity: [f32; 3],
    _pad: f32,
    /// RGBA colour, alpha always 1.
    pub color: [f32; 4],
}

impl From<&Agent> for AgentInstance {
    fn from(agent: &Agent) -> Self {
        Self {
            position: agent.position.to_array(),
            speed: agent.speed(),
            velocity: agent.velocity.to_array(),
            _pad: 0.0,
            color: agent.color.extend(1.0).to_array(),
        }
    }
}

/// View a slice of instances as raw bytes for upload.
pub fn instance_bytes(instances: &[AgentInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<AgentInstance>(), 48);
        assert_eq!(std::mem::offset_of!(AgentInstance, velocity), 16);
        assert_eq!(std::mem::offset_of!(AgentInstance, color), 32);
    }

    #[test]
    fn test_from_agent() {
        let agent = Agent::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 0.0, 4.0))
            .with_appearance(crate::Appearance::Reds, Vec3::new(0.8, 0.0, 0.0));
        let instance = AgentInstance::from(&agent);
        assert_eq!(instance.position, [1.0, 2.0, 3.0]);
        assert_eq!(instance.speed, 5.0);
        assert_eq!(instance.velocity, [3.0, 0.0, 4.0]);
        assert_eq!(instance.color, [0.8, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bytes() {
        let instances = vec![AgentInstance::default(); 3];
        assert_eq!(instance_bytes(&instances).len(), 3 * 48);
    }
}
