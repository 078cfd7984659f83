//! French locale formatting.
//!
//! All documents are rendered for the fr-FR locale: space-grouped
//! thousands, decimal comma, DD/MM/YYYY dates, and amounts in words on
//! official statements.

mod date;
mod lettres;
mod nombre;

pub use date::{format_date, nom_du_mois};
pub use lettres::montant_en_lettres;
pub use nombre::format_montant;
