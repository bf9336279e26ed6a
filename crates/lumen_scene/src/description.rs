//! JSON scene documents and their resolution into renderable objects.
//!
//! Triplets, textures and materials can be written inline or declared once
//! in a named table and referenced by name. Named materials and textures
//! are built once and shared between every object that uses them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lumen_math::{Affine, Mat4, Point3, Vec3};
use lumen_renderer::{
    AntiAlias, Background, BvhNode, Camera, CheckerTexture, Dielectric, DiffuseLight, Hittable,
    HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Perlin, Quad,
    RenderConfig, SolidColor, Sphere, Texture, Transform,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::{SceneError, SceneResult};
use crate::texture::TextureCache;
use crate::Scene;

/// Seed for noise textures that do not name one.
pub const DEFAULT_NOISE_SEED: u64 = 0x5EED_0F_7E47;

/// Either a name declared in one of the document's tables or an inline value.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Ref<T> {
    Name(String),
    Inline(T),
}

pub type TripletRef = Ref<[f64; 3]>;
pub type TextureRef = Ref<TextureDescription>;
pub type MaterialRef = Ref<MaterialDescription>;

/// Top-level scene document.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub render: RenderDescription,
    #[serde(default)]
    pub triplets: HashMap<String, [f64; 3]>,
    #[serde(default)]
    pub textures: HashMap<String, TextureDescription>,
    #[serde(default)]
    pub materials: HashMap<String, MaterialDescription>,
    pub world: Vec<ObjectDescription>,
}

/// Camera settings; anything left out keeps the camera default.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CameraDescription {
    pub aspect_ratio: Option<f64>,
    pub image_width: Option<u32>,
    pub vfov: Option<f64>,
    pub look_from: Option<TripletRef>,
    pub look_at: Option<TripletRef>,
    pub vup: Option<TripletRef>,
    pub defocus_angle: Option<f64>,
    pub focus_dist: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RenderDescription {
    pub samples: Option<SamplesDescription>,
    pub max_depth: Option<u32>,
    pub background: Option<BackgroundDescription>,
    pub seed: Option<u64>,
}

/// `{"grid": [x, y]}` or `{"random": n}`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SamplesDescription {
    Grid([u32; 2]),
    Random(u32),
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKeyword {
    Sky,
}

/// `"sky"` or a color triplet.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum BackgroundDescription {
    Keyword(BackgroundKeyword),
    Color(TripletRef),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDescription {
    Solid {
        color: TripletRef,
    },
    /// Each side is either a texture or a plain color.
    Checker {
        scale: f64,
        #[serde(default)]
        even: Option<Box<TextureRef>>,
        #[serde(default)]
        odd: Option<Box<TextureRef>>,
        #[serde(default)]
        even_color: Option<TripletRef>,
        #[serde(default)]
        odd_color: Option<TripletRef>,
    },
    Noise {
        scale: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Path relative to the scene file.
    Image {
        file: String,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian {
        #[serde(default)]
        albedo: Option<TripletRef>,
        #[serde(default)]
        texture: Option<TextureRef>,
    },
    Metal {
        albedo: TripletRef,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        refraction_index: f64,
    },
    DiffuseLight {
        #[serde(default)]
        emit: Option<TripletRef>,
        #[serde(default)]
        texture: Option<TextureRef>,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    /// A sphere, moving to `center2` over the shutter interval when given.
    Sphere {
        center: TripletRef,
        #[serde(default)]
        center2: Option<TripletRef>,
        radius: f64,
        material: MaterialRef,
    },
    Quad {
        corner: TripletRef,
        u: TripletRef,
        v: TripletRef,
        material: MaterialRef,
    },
    #[serde(rename = "box")]
    Cuboid {
        corner1: TripletRef,
        corner2: TripletRef,
        material: MaterialRef,
    },
    List {
        objects: Vec<ObjectDescription>,
    },
    /// Operations apply in order, the first one closest to object space.
    Transform {
        object: Box<ObjectDescription>,
        ops: Vec<TransformOp>,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    Translate(TripletRef),
    Rotate { axis: RotationAxis, degrees: f64 },
    Scale(TripletRef),
    /// Row-major 4x4 matrix.
    Matrix([[f64; 4]; 4]),
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalAxis {
    X,
    Y,
    Z,
}

/// `"x"`, `"y"`, `"z"` or an arbitrary direction.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RotationAxis {
    Principal(PrincipalAxis),
    Vector([f64; 3]),
}

impl RotationAxis {
    fn direction(&self) -> Vec3 {
        match self {
            RotationAxis::Principal(PrincipalAxis::X) => Vec3::X,
            RotationAxis::Principal(PrincipalAxis::Y) => Vec3::Y,
            RotationAxis::Principal(PrincipalAxis::Z) => Vec3::Z,
            RotationAxis::Vector(v) => Vec3::from_array(*v),
        }
    }
}

impl SceneDescription {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the renderable scene, loading image textures relative to `base_dir`.
    pub fn build(&self, base_dir: impl AsRef<Path>) -> SceneResult<Scene> {
        let mut resolver = Resolver::new(self, TextureCache::with_base_dir(base_dir.as_ref()));

        let camera = resolver.camera(&self.camera)?;
        let config = resolver.render_config(&self.render)?;

        let objects = self
            .world
            .iter()
            .map(|object| resolver.object(object))
            .collect::<SceneResult<Vec<_>>>()?;

        log::debug!(
            "Resolved {} materials, {} textures, {} images",
            resolver.materials.len(),
            resolver.textures.len(),
            resolver.images.len()
        );

        Ok(Scene {
            camera,
            config,
            world: BvhNode::new(objects)?,
        })
    }
}

/// Resolution state for one document.
struct Resolver<'d> {
    desc: &'d SceneDescription,
    images: TextureCache,
    textures: HashMap<String, Arc<dyn Texture>>,
    materials: HashMap<String, Arc<dyn Material>>,
    /// Named textures currently being built, to detect cycles
    resolving: Vec<String>,
}

impl<'d> Resolver<'d> {
    fn new(desc: &'d SceneDescription, images: TextureCache) -> Self {
        Self {
            desc,
            images,
            textures: HashMap::new(),
            materials: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    fn triplet(&self, r: &TripletRef) -> SceneResult<Vec3> {
        let values = match r {
            Ref::Inline(values) => values,
            Ref::Name(name) => {
                self.desc
                    .triplets
                    .get(name)
                    .ok_or_else(|| SceneError::UnknownReference {
                        kind: "triplet",
                        name: name.clone(),
                    })?
            }
        };
        Ok(Vec3::from_array(*values))
    }

    fn optional_triplet(&self, r: Option<&TripletRef>, default: Vec3) -> SceneResult<Vec3> {
        r.map_or(Ok(default), |r| self.triplet(r))
    }

    fn camera(&self, desc: &CameraDescription) -> SceneResult<Camera> {
        let base = Camera::new();

        Ok(Camera::new()
            .with_resolution(
                desc.image_width.unwrap_or(base.image_width()),
                desc.aspect_ratio.unwrap_or(base.aspect_ratio()),
            )
            .with_position(
                self.optional_triplet(desc.look_from.as_ref(), base.look_from())?,
                self.optional_triplet(desc.look_at.as_ref(), base.look_at())?,
                self.optional_triplet(desc.vup.as_ref(), base.vup())?,
            )
            .with_lens(
                desc.vfov.unwrap_or(base.vfov()),
                desc.defocus_angle.unwrap_or(base.defocus_angle()),
                desc.focus_dist.unwrap_or(base.focus_dist()),
            ))
    }

    fn render_config(&self, desc: &RenderDescription) -> SceneResult<RenderConfig> {
        let mut config = RenderConfig::default();

        if let Some(samples) = desc.samples {
            config.anti_alias = match samples {
                SamplesDescription::Grid([x, y]) => AntiAlias::Grid { x, y },
                SamplesDescription::Random(n) => AntiAlias::Random(n),
            };
        }
        if let Some(max_depth) = desc.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(background) = &desc.background {
            config.background = match background {
                BackgroundDescription::Keyword(BackgroundKeyword::Sky) => Background::Sky,
                BackgroundDescription::Color(color) => Background::Solid(self.triplet(color)?),
            };
        }
        config.seed = desc.seed;

        config.validate()?;
        Ok(config)
    }

    fn texture(&mut self, r: &TextureRef) -> SceneResult<Arc<dyn Texture>> {
        let name = match r {
            Ref::Inline(desc) => return self.build_texture(desc),
            Ref::Name(name) => name,
        };

        if let Some(texture) = self.textures.get(name) {
            return Ok(texture.clone());
        }
        if self.resolving.contains(name) {
            return Err(SceneError::CyclicReference {
                kind: "texture",
                name: name.clone(),
            });
        }

        let all = self.desc;
        let desc = all
            .textures
            .get(name)
            .ok_or_else(|| SceneError::UnknownReference {
                kind: "texture",
                name: name.clone(),
            })?;

        self.resolving.push(name.clone());
        let built = self.build_texture(desc);
        self.resolving.pop();

        let texture = built?;
        self.textures.insert(name.clone(), texture.clone());
        Ok(texture)
    }

    /// One checker side, given either as a texture or as a color.
    fn checker_side(
        &mut self,
        side: &str,
        texture: Option<&TextureRef>,
        color: Option<&TripletRef>,
    ) -> SceneResult<Arc<dyn Texture>> {
        match (texture, color) {
            (Some(texture), None) => self.texture(texture),
            (None, Some(color)) => Ok(Arc::new(SolidColor::new(self.triplet(color)?))),
            (Some(_), Some(_)) => Err(SceneError::Invalid(format!(
                "checker texture has both `{side}` and `{side}_color`"
            ))),
            (None, None) => Err(SceneError::Invalid(format!(
                "checker texture needs `{side}` or `{side}_color`"
            ))),
        }
    }

    fn build_texture(&mut self, desc: &TextureDescription) -> SceneResult<Arc<dyn Texture>> {
        Ok(match desc {
            TextureDescription::Solid { color } => Arc::new(SolidColor::new(self.triplet(color)?)),
            TextureDescription::Checker {
                scale,
                even,
                odd,
                even_color,
                odd_color,
            } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(SceneError::Invalid(format!(
                        "checker scale {scale} must be positive"
                    )));
                }
                let even = self.checker_side("even", even.as_deref(), even_color.as_ref())?;
                let odd = self.checker_side("odd", odd.as_deref(), odd_color.as_ref())?;
                Arc::new(CheckerTexture::new(*scale, even, odd))
            }
            TextureDescription::Noise { scale, seed } => {
                let mut rng = StdRng::seed_from_u64(seed.unwrap_or(DEFAULT_NOISE_SEED));
                Arc::new(NoiseTexture::new(Perlin::new(&mut rng), *scale))
            }
            TextureDescription::Image { file } => Arc::new(ImageTexture::new(self.images.load(file)?)),
        })
    }

    /// A material color given either as a plain color or as a texture.
    fn material_texture(
        &mut self,
        kind: &str,
        color: Option<&TripletRef>,
        texture: Option<&TextureRef>,
    ) -> SceneResult<Arc<dyn Texture>> {
        match (color, texture) {
            (Some(color), None) => Ok(Arc::new(SolidColor::new(self.triplet(color)?))),
            (None, Some(texture)) => self.texture(texture),
            _ => Err(SceneError::Invalid(format!(
                "{kind} needs exactly one of a color or `texture`"
            ))),
        }
    }

    fn material(&mut self, r: &MaterialRef) -> SceneResult<Arc<dyn Material>> {
        let name = match r {
            Ref::Inline(desc) => return self.build_material(desc),
            Ref::Name(name) => name,
        };

        if let Some(material) = self.materials.get(name) {
            return Ok(material.clone());
        }

        let all = self.desc;
        let desc = all
            .materials
            .get(name)
            .ok_or_else(|| SceneError::UnknownReference {
                kind: "material",
                name: name.clone(),
            })?;

        let material = self.build_material(desc)?;
        self.materials.insert(name.clone(), material.clone());
        Ok(material)
    }

    fn build_material(&mut self, desc: &MaterialDescription) -> SceneResult<Arc<dyn Material>> {
        Ok(match desc {
            MaterialDescription::Lambertian { albedo, texture } => Arc::new(
                Lambertian::from_texture(self.material_texture(
                    "lambertian",
                    albedo.as_ref(),
                    texture.as_ref(),
                )?),
            ),
            MaterialDescription::Metal { albedo, fuzz } => {
                Arc::new(Metal::new(self.triplet(albedo)?, *fuzz))
            }
            MaterialDescription::Dielectric { refraction_index } => {
                if !(refraction_index.is_finite() && *refraction_index > 0.0) {
                    return Err(SceneError::Invalid(format!(
                        "refraction index {refraction_index} must be positive"
                    )));
                }
                Arc::new(Dielectric::new(*refraction_index))
            }
            MaterialDescription::DiffuseLight { emit, texture } => Arc::new(
                DiffuseLight::from_texture(self.material_texture(
                    "diffuse_light",
                    emit.as_ref(),
                    texture.as_ref(),
                )?),
            ),
        })
    }

    fn object(&mut self, desc: &ObjectDescription) -> SceneResult<Arc<dyn Hittable>> {
        Ok(match desc {
            ObjectDescription::Sphere {
                center,
                center2,
                radius,
                material,
            } => {
                let center: Point3 = self.triplet(center)?;
                let center2 = self.optional_triplet(center2.as_ref(), center)?;
                Arc::new(Sphere::moving(center, center2, *radius, self.material(material)?))
            }
            ObjectDescription::Quad {
                corner,
                u,
                v,
                material,
            } => Arc::new(Quad::new(
                self.triplet(corner)?,
                self.triplet(u)?,
                self.triplet(v)?,
                self.material(material)?,
            )),
            ObjectDescription::Cuboid {
                corner1,
                corner2,
                material,
            } => Arc::new(Quad::make_box(
                self.triplet(corner1)?,
                self.triplet(corner2)?,
                self.material(material)?,
            )),
            ObjectDescription::List { objects } => Arc::new(
                objects
                    .iter()
                    .map(|object| self.object(object))
                    .collect::<SceneResult<HittableList>>()?,
            ),
            ObjectDescription::Transform { object, ops } => {
                let affine = self.affine(ops)?;
                Arc::new(Transform::new(self.object(object)?, affine))
            }
        })
    }

    fn affine(&self, ops: &[TransformOp]) -> SceneResult<Affine> {
        ops.iter().try_fold(Affine::new(), |affine, op| -> SceneResult<Affine> {
            Ok(match op {
                TransformOp::Translate(offset) => affine.translate(self.triplet(offset)?),
                TransformOp::Rotate { axis, degrees } => {
                    affine.rotate(axis.direction(), *degrees)
                }
                TransformOp::Scale(factors) => affine.scale(self.triplet(factors)?)?,
                TransformOp::Matrix(rows) => {
                    let step = Mat4::from_cols_array_2d(rows).transpose();
                    Affine::from_matrix(step * *affine.matrix())?
                }
            })
        })
    }
}
