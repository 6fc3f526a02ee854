//! Annotation inspection: list detection and converter/hint accessors.

use crate::signature::Annotation;
use crate::value::Converter;

/// Does the annotation denote "a list whose elements are of type T"?
pub fn is_list(annotation: &Annotation) -> bool {
    list_element(annotation).is_some()
}

/// The element converter of a list annotation.
pub fn list_element(annotation: &Annotation) -> Option<Converter> {
    match annotation {
        Annotation::List(element) => Some(*element),
        Annotation::Converter(_) | Annotation::Hint(_) => None,
    }
}

/// The converter of a plain (non-list) type annotation.
pub fn direct_converter(annotation: &Annotation) -> Option<Converter> {
    match annotation {
        Annotation::Converter(converter) => Some(*converter),
        Annotation::List(_) | Annotation::Hint(_) => None,
    }
}

/// Free-text hint, if the annotation is not a type at all.
pub fn hint(annotation: &Annotation) -> Option<&str> {
    match annotation {
        Annotation::Hint(text) => Some(text),
        Annotation::Converter(_) | Annotation::List(_) => None,
    }
}
