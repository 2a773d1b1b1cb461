//! Render backend probing
//!
//! Renderers differ in which backends they ship. Candidates are tried in
//! priority order and each probe is logged; the first supported backend wins.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderBackend {
    EeveeNext,
    Eevee,
    Workbench,
    Cycles,
}

impl RenderBackend {
    /// Default priority: fast rasterizers first
    pub const PREFERENCE: [RenderBackend; 3] = [
        RenderBackend::EeveeNext,
        RenderBackend::Eevee,
        RenderBackend::Workbench,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            RenderBackend::EeveeNext => "eevee_next",
            RenderBackend::Eevee => "eevee",
            RenderBackend::Workbench => "workbench",
            RenderBackend::Cycles => "cycles",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "eevee_next" => Some(RenderBackend::EeveeNext),
            "eevee" => Some(RenderBackend::Eevee),
            "workbench" => Some(RenderBackend::Workbench),
            "cycles" => Some(RenderBackend::Cycles),
            _ => None,
        }
    }
}

/// Result of probing one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub backend: RenderBackend,
    pub supported: bool,
}

/// Probes candidates in order and stops at the first supported one
///
/// Returns every probe made, so callers can report what was tried.
pub fn probe_backends(renderer: &dyn Renderer, candidates: &[RenderBackend]) -> Vec<ProbeResult> {
    let mut results = Vec::new();
    for &backend in candidates {
        let supported = renderer.supports_backend(backend);
        debug!(
            "Render backend '{}' {} by {}",
            backend.identifier(),
            if supported { "supported" } else { "not supported" },
            renderer.name()
        );
        results.push(ProbeResult { backend, supported });
        if supported {
            break;
        }
    }
    results
}

/// First supported backend, or `None` to leave the choice to the renderer
pub fn select_backend(renderer: &dyn Renderer, candidates: &[RenderBackend]) -> Option<RenderBackend> {
    let selected = probe_backends(renderer, candidates)
        .into_iter()
        .find(|result| result.supported)
        .map(|result| result.backend);

    match selected {
        Some(backend) => info!("Using render backend '{}'", backend.identifier()),
        None => info!("No preferred backend available, using the renderer's default"),
    }
    selected
}
