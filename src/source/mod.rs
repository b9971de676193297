//! Surface mass balance forcing.
//!
//! A [`MassBalanceModel`] gives the rate at a position; [`MassBalance1D`]
//! holds it sampled on the grid for the run.

mod mass_balance;

pub use mass_balance::{
    ConstantMassBalance, MassBalance1D, MassBalanceModel, PolynomialAccumulation,
};
