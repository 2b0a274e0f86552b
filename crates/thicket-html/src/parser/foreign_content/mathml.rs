//! MathML name fix-ups and predicates.

use thicket_dom::{Attribute, ElementData, Namespace};

/// [§ 13.2.6.1 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "if the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub(crate) fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut() {
        if attr.name == "definitionurl" {
            attr.name = "definitionURL".to_string();
        }
    }
}

/// [§ 13.2.6 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A MathML mi element, A MathML mo element, A MathML mn element, A MathML ms
/// element, A MathML mtext element"
pub(crate) fn is_mathml_text_integration_point(element: &ElementData) -> bool {
    element.namespace == Namespace::MathMl
        && matches!(element.local_name(), "mi" | "mo" | "mn" | "ms" | "mtext")
}
