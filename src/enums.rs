use crate::error::VolumeError;
use std::fmt;
use std::str::FromStr;

/// Orthogonal cross-section of the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Fixed z, output is width x height
    XY,
    /// Fixed y, output is width x depth
    XZ,
    /// Fixed x, output is height x depth
    YZ,
}

impl FromStr for Plane {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "XY" => Ok(Plane::XY),
            "XZ" => Ok(Plane::XZ),
            "YZ" => Ok(Plane::YZ),
            _ => Err(VolumeError::InvalidParameter(format!(
                "unknown plane {s:?}, expected XY, XZ or YZ"
            ))),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plane::XY => write!(f, "XY"),
            Plane::XZ => write!(f, "XZ"),
            Plane::YZ => write!(f, "YZ"),
        }
    }
}

/// Reduction applied along the depth axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Maximum intensity
    Mip,
    /// Minimum intensity
    MinIp,
    /// Mean intensity, truncated
    Aip,
    /// Median intensity, always over the full depth
    AipMedian,
}

impl ProjectionKind {
    /// Whether a z sub-range can restrict this projection.
    pub fn supports_slab(self) -> bool {
        !matches!(self, ProjectionKind::AipMedian)
    }
}

impl FromStr for ProjectionKind {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MIP" => Ok(ProjectionKind::Mip),
            "MinIP" => Ok(ProjectionKind::MinIp),
            "AIP" => Ok(ProjectionKind::Aip),
            "AIPMedian" => Ok(ProjectionKind::AipMedian),
            _ => Err(VolumeError::InvalidParameter(format!(
                "unknown projection {s:?}, expected MIP, MinIP, AIP or AIPMedian"
            ))),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionKind::Mip => write!(f, "MIP"),
            ProjectionKind::MinIp => write!(f, "MinIP"),
            ProjectionKind::Aip => write!(f, "AIP"),
            ProjectionKind::AipMedian => write!(f, "AIPMedian"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKind {
    Gaussian,
    Median,
}

impl FromStr for BlurKind {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("gaussian") {
            Ok(BlurKind::Gaussian)
        } else if s.eq_ignore_ascii_case("median") {
            Ok(BlurKind::Median)
        } else {
            Err(VolumeError::InvalidParameter(format!(
                "unknown 3D blur {s:?}, expected Gaussian or Median"
            )))
        }
    }
}
