use glam::Vec3;

use crate::config::TerrainConfig;
use crate::error::{Error, Result};

/// Half thickness of the box standing in for a level plane
///
/// Thick enough that a fast thin board cannot end up inside it.
pub const FLAT_COLLIDER_HALF_THICKNESS: f32 = 0.5;

/// Collider shape used for a terrain mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    /// Box with the mesh footprint, top face at y = 0
    FlatBox,
    /// Exact triangles from the mesh arrays
    Trimesh,
}

/// Terrain vertices and triangles in terrain-local space
///
/// Every index refers to an existing vertex. With [`ColliderKind::Trimesh`]
/// the collider is built from these same arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    collider_kind: ColliderKind,
    width: f32,
    depth: f32,
    top_height: f32,
}

impl TerrainMesh {
    /// Flat plane when the configured slope is zero, sloped wedge otherwise
    pub fn from_config(config: &TerrainConfig) -> Result<Self> {
        if config.slope_angle_degrees == 0.0 {
            generate_flat(config.width, config.depth)
        } else {
            generate_sloped(config.width, config.depth, config.slope_angle_degrees)
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Indices as one flat list, three per triangle
    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    pub fn collider_kind(&self) -> ColliderKind {
        self.collider_kind
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Height of the near ridge above the base; zero for a flat plane
    pub fn top_height(&self) -> f32 {
        self.top_height
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Height of the walkable top surface at `(x, z)`, `None` outside the footprint
    pub fn surface_height(&self, x: f32, z: f32) -> Option<f32> {
        let (hw, hd) = (self.width * 0.5, self.depth * 0.5);
        if x.abs() > hw || z.abs() > hd {
            return None;
        }
        // Linear from the near ridge (z = -hd) down to the far edge (z = +hd)
        Some(self.top_height * (hd - z) / self.depth)
    }

    /// Corner positions of triangle `index`
    pub fn triangle(&self, index: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.indices.get(index)?;
        Some([
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ])
    }
}

/// Unnormalized normal of a counter-clockwise triangle
pub fn triangle_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
    (b - a).cross(c - a)
}

fn check_extents(width: f32, depth: f32) -> Result<()> {
    if !(width.is_finite() && width > 0.0 && depth.is_finite() && depth > 0.0) {
        return Err(Error::InvalidTerrain(format!(
            "extents must be positive, got {width} x {depth}"
        )));
    }
    Ok(())
}

/// Level plane of `width` x `depth` centred on the origin at y = 0
pub fn generate_flat(width: f32, depth: f32) -> Result<TerrainMesh> {
    check_extents(width, depth)?;
    let (hw, hd) = (width * 0.5, depth * 0.5);

    let vertices = vec![
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(-hw, 0.0, hd),
    ];
    // Counter-clockwise seen from above
    let indices = vec![[0, 3, 2], [0, 2, 1]];

    Ok(TerrainMesh {
        vertices,
        indices,
        collider_kind: ColliderKind::FlatBox,
        width,
        depth,
        top_height: 0.0,
    })
}

/// Wedge rising from the far edge (+Z) to a ridge above the near edge (-Z)
///
/// The ridge sits `depth * tan(angle)` above the base. A zero angle gives a
/// zero-height wedge. The slope is a full rectangle from ridge to far edge,
/// so vertex 6, the far-edge midpoint, is a spare vertex that no triangle
/// references.
///
/// # Errors
/// [`Error::InvalidTerrain`] for non-positive extents or an angle outside
/// `[0, 90)` degrees.
pub fn generate_sloped(width: f32, depth: f32, slope_angle_degrees: f32) -> Result<TerrainMesh> {
    check_extents(width, depth)?;
    if !(slope_angle_degrees.is_finite() && (0.0..90.0).contains(&slope_angle_degrees)) {
        return Err(Error::InvalidTerrain(format!(
            "slope angle must be in [0, 90) degrees, got {slope_angle_degrees}"
        )));
    }

    let (hw, hd) = (width * 0.5, depth * 0.5);
    let top_height = depth * slope_angle_degrees.to_radians().tan();

    let vertices = vec![
        // base: near-left, near-right, far-right, far-left
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(-hw, 0.0, hd),
        // ridge above the near corners
        Vec3::new(-hw, top_height, -hd),
        Vec3::new(hw, top_height, -hd),
        // far-edge midpoint, on the lower edge of the slope
        Vec3::new(0.0, 0.0, hd),
    ];
    let indices = vec![
        // base
        [0, 1, 2],
        [0, 2, 3],
        // near face
        [0, 4, 5],
        [0, 5, 1],
        // flanks
        [0, 3, 4],
        [1, 5, 2],
        // slope
        [4, 3, 2],
        [4, 2, 5],
    ];

    tracing::debug!(width, depth, slope_angle_degrees, top_height, "generated sloped terrain");

    Ok(TerrainMesh {
        vertices,
        indices,
        collider_kind: ColliderKind::Trimesh,
        width,
        depth,
        top_height,
    })
}
