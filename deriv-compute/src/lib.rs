//! The symbolic core of the derivative calculator.
//!
//! Input text is parsed by [`deriv_parser`] and converted into a [`symbolic::Expr`], which can
//! then be differentiated with [`symbolic::derivative`] and reduced to a canonical form with
//! [`symbolic::simplify`].

pub mod primitive;
pub mod symbolic;
