// Ciphergate — PEM Module
//
// Normalizes caller-supplied key text and classifies it by its PEM armor.
// Classification looks at the header/footer markers only; the key body is
// decoded later by the engine.

mod codec;

pub use codec::{classify, inspect, normalize, preview, KeyKind, KeyPreview, PemKey, PemLabel};
