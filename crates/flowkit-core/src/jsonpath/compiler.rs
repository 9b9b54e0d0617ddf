//! Lowering of parsed paths into executable step pipelines
//!
//! Passes:
//! - `..name` becomes a single [`Step::DescendantMember`]
//! - repeated `..` collapse into one
//! - union members are de-duplicated, and single-member unions unwrapped

use super::ast::*;

/// Compile a parsed path into executable steps
pub fn compile(path: &Path) -> CompiledPath {
    let mut steps: Vec<Step> = Vec::with_capacity(path.selectors.len());

    for selector in &path.selectors {
        let after_descendants = matches!(steps.last(), Some(Step::Descendants));
        match lower(selector) {
            Step::Child(name) if after_descendants => {
                steps.pop();
                steps.push(Step::DescendantMember(name));
            }
            Step::Descendants if after_descendants => {}
            step => steps.push(step),
        }
    }

    CompiledPath { steps }
}

fn lower(selector: &Selector) -> Step {
    match selector {
        Selector::Child(name) => Step::Child(name.clone()),
        Selector::Index(index) => Step::Index(*index),
        Selector::Slice(bounds) => Step::Slice(*bounds),
        Selector::Wildcard => Step::Wildcard,
        Selector::Descendants => Step::Descendants,
        Selector::Filter(filter) => Step::Filter(filter.clone()),
        Selector::Union(members) => {
            let mut unique: Vec<Step> = Vec::with_capacity(members.len());
            for step in members.iter().map(lower) {
                if !unique.contains(&step) {
                    unique.push(step);
                }
            }
            if unique.len() == 1 {
                unique.remove(0)
            } else {
                Step::Union(unique)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath::Parser;

    fn compiled(input: &str) -> CompiledPath {
        compile(&Parser::new(input).unwrap().parse().unwrap())
    }

    #[test]
    fn test_fuses_descendant_member() {
        assert_eq!(
            compiled("$..author").steps,
            vec![Step::DescendantMember("author".into())]
        );
        assert_eq!(
            compiled("$.store..price").steps,
            vec![Step::Child("store".into()), Step::DescendantMember("price".into())]
        );
    }

    #[test]
    fn test_keeps_descendants_before_brackets() {
        assert_eq!(
            compiled("$..[0]").steps,
            vec![Step::Descendants, Step::Index(0)]
        );
    }

    #[test]
    fn test_union_dedup() {
        assert_eq!(
            compiled("$.a[0,0,1]").steps,
            vec![Step::Child("a".into()), Step::Union(vec![Step::Index(0), Step::Index(1)])]
        );
        assert_eq!(compiled("$.a[1,1]").steps, vec![Step::Child("a".into()), Step::Index(1)]);
    }

    #[test]
    fn test_simple_property() {
        assert_eq!(compiled("$.title").simple_property(), Some("title"));
        assert_eq!(compiled("$.a.b").simple_property(), None);
    }
}
