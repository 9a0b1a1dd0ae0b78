use confique::Config as DeriveConfig;
use dotnote::Notation;

#[derive(Debug, DeriveConfig)]
pub struct Config {
    /// The notation `dotnote flatten` writes when neither `--grouped` nor `--dot-only` is passed:
    /// `"grouped"` collapses shared prefixes into `a(b, c)`, `"dot-only"` writes `a.b, a.c`.
    #[config(env = "DOTNOTE_NOTATION", default = "grouped")]
    pub notation: Notation,

    /// Whether `dotnote unflatten` indents its JSON output by two spaces when neither `--pretty`
    /// nor `--compact` is passed.
    #[config(env = "DOTNOTE_PRETTY", default = true)]
    pub pretty: bool,
}
