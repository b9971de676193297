//! Ice flow laws.
//!
//! The surface evolves by nonlinear diffusion
//!
//! ∂S/∂t = ṁ + ∂/∂x (D ∂S/∂x),  D = Γ H^(n+2) |∂S/∂x|^(n-1)
//!
//! with Γ = 2A (ρg)^n / (n+2) from Glen's flow law.

mod shallow_ice;

pub use shallow_ice::{A_BENCHMARK, G_STANDARD, N_GLEN, RHO_ICE, ShallowIce1D};
