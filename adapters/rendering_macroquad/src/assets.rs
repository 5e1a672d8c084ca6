use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::{Mat4, Quat, Vec2, Vec3};
use macroquad::texture::Texture2D;
use ray_arena_rendering::{AssetAvailability, AssetKind, AssetRequests, AssetSlot};

#[cfg(feature = "audio")]
use macroquad::audio::Sound;

/// Triangle mesh decoded from a Wavefront OBJ file, kept on the CPU so it can
/// be posed per instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ObjModel {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u16>,
}

impl ObjModel {
    /// Parses OBJ text. Materials are ignored; every shape is merged into one
    /// indexed mesh.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self> {
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let mut reader = bytes;
        let (shapes, _materials) = tobj::load_obj_buf(&mut reader, &options, |_| {
            Ok((Vec::new(), Default::default()))
        })
        .context("failed to parse OBJ data")?;
        if shapes.is_empty() {
            bail!("OBJ data contains no meshes");
        }

        let mut model = Self::default();
        for shape in shapes {
            let mesh = shape.mesh;
            let base = model.positions.len();
            let count = mesh.positions.len() / 3;
            for vertex in 0..count {
                model.positions.push(Vec3::new(
                    mesh.positions[3 * vertex],
                    mesh.positions[3 * vertex + 1],
                    mesh.positions[3 * vertex + 2],
                ));
                let uv = if mesh.texcoords.len() >= 2 * (vertex + 1) {
                    Vec2::new(
                        mesh.texcoords[2 * vertex],
                        1.0 - mesh.texcoords[2 * vertex + 1],
                    )
                } else {
                    Vec2::ZERO
                };
                model.uvs.push(uv);
            }

            if mesh.indices.is_empty() {
                for vertex in 0..count {
                    model.indices.push(mesh_index(base + vertex)?);
                }
            } else {
                for &index in &mesh.indices {
                    model.indices.push(mesh_index(base + index as usize)?);
                }
            }
        }
        Ok(model)
    }

    pub(crate) fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub(crate) fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Vertex positions after scaling, turning about +Y and translating.
    pub(crate) fn posed_positions(
        &self,
        position: Vec3,
        rotation_degrees: f32,
        scale: f32,
    ) -> impl Iterator<Item = Vec3> + '_ {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            Quat::from_rotation_y(rotation_degrees.to_radians()),
            position,
        );
        self.positions
            .iter()
            .map(move |vertex| transform.transform_point3(*vertex))
    }
}

fn mesh_index(index: usize) -> Result<u16> {
    u16::try_from(index).context("OBJ index exceeds u16")
}

/// Textures, models and sounds loaded for the requested asset slots.
#[derive(Debug, Default)]
pub(crate) struct AssetCache {
    textures: HashMap<AssetSlot, Texture2D>,
    models: HashMap<AssetSlot, ObjModel>,
    #[cfg(feature = "audio")]
    sounds: HashMap<AssetSlot, Sound>,
    availability: AssetAvailability,
}

impl AssetCache {
    /// Loads every texture and model request from disk.
    pub(crate) fn from_requests(requests: &AssetRequests) -> Self {
        Self::from_requests_with_loaders(requests, &mut texture_loader, &mut model_loader)
    }

    fn from_requests_with_loaders(
        requests: &AssetRequests,
        load_texture: &mut impl FnMut(AssetSlot, &Path) -> Result<Texture2D>,
        load_model: &mut impl FnMut(AssetSlot, &Path) -> Result<ObjModel>,
    ) -> Self {
        let mut cache = Self::default();
        for (slot, path) in requests.iter() {
            let loaded = match slot.kind() {
                AssetKind::Texture => load_texture(slot, path).map(|texture| {
                    let _ = cache.textures.insert(slot, texture);
                }),
                AssetKind::Model => load_model(slot, path).map(|model| {
                    let _ = cache.models.insert(slot, model);
                }),
                AssetKind::Sound => {
                    if !cfg!(feature = "audio") {
                        log::debug!(
                            "audio support disabled; not loading {} from {}",
                            slot.label(),
                            path.display()
                        );
                    }
                    continue;
                }
            };
            match loaded {
                Ok(()) => cache.availability.mark_loaded(slot),
                Err(error) => log::warn!(
                    "{} unavailable, drawing fallback: {error:#}",
                    slot.label()
                ),
            }
        }
        cache
    }

    /// Loads sound requests. Sound decoding is asynchronous in macroquad.
    #[cfg(feature = "audio")]
    pub(crate) async fn load_sounds(&mut self, requests: &AssetRequests) {
        for (slot, path) in requests.iter() {
            if slot.kind() != AssetKind::Sound {
                continue;
            }
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(error) => {
                    log::warn!(
                        "{} unavailable: failed to read {}: {error}",
                        slot.label(),
                        path.display()
                    );
                    continue;
                }
            };
            match macroquad::audio::load_sound_from_bytes(&bytes).await {
                Ok(sound) => {
                    let _ = self.sounds.insert(slot, sound);
                    self.availability.mark_loaded(slot);
                }
                Err(error) => log::warn!("{} unavailable: {error:?}", slot.label()),
            }
        }
    }

    pub(crate) fn availability(&self) -> &AssetAvailability {
        &self.availability
    }

    pub(crate) fn texture(&self, slot: AssetSlot) -> Option<Texture2D> {
        self.textures.get(&slot).copied()
    }

    pub(crate) fn model(&self, slot: AssetSlot) -> Option<&ObjModel> {
        self.models.get(&slot)
    }

    #[cfg(feature = "audio")]
    pub(crate) fn sound(&self, slot: AssetSlot) -> Option<Sound> {
        self.sounds.get(&slot).copied()
    }

    /// Frees GPU textures and stops any playing sounds.
    pub(crate) fn release(self) {
        for texture in self.textures.into_values() {
            texture.delete();
        }
        #[cfg(feature = "audio")]
        for sound in self.sounds.into_values() {
            macroquad::audio::stop_sound(sound);
        }
    }
}

/// RGBA pixels decoded from an image file, ready for upload.
#[derive(Debug)]
struct DecodedImage {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl DecodedImage {
    fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .context("unsupported or corrupt image data")?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width: u16::try_from(width).context("image wider than 65535 px")?,
            height: u16::try_from(height).context("image taller than 65535 px")?,
            pixels: image.into_raw(),
        })
    }
}

fn texture_loader(_slot: AssetSlot, path: &Path) -> Result<Texture2D> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image at {}", path.display()))?;
    let image = DecodedImage::decode(&bytes)
        .with_context(|| format!("invalid image {}", path.display()))?;
    Ok(Texture2D::from_rgba8(image.width, image.height, &image.pixels))
}

fn model_loader(_slot: AssetSlot, path: &Path) -> Result<ObjModel> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read model at {}", path.display()))?;
    ObjModel::parse(&bytes).with_context(|| format!("invalid model {}", path.display()))
}
