//! Properties of the reconstruct -> render pipeline, checked through the
//! public api and by parsing the generated text again.
use hcl::{Body, Expression};
use pretty_assertions::assert_eq;
use state2hcl::node::{AttributeNode, Object};
use state2hcl::reconstruct::{flatten, reconstruct, ReconstructError};
use state2hcl::render::render;
use std::collections::BTreeMap;

fn flat(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Flattens the logical content of a parsed body: blocks nest by their
/// identifier, repeated blocks and arrays by element position.
fn flatten_body(prefix: &str, body: &Body, flat: &mut BTreeMap<String, String>) {
    for attribute in body.attributes() {
        flatten_expr(&join(prefix, attribute.key.as_str()), &attribute.expr, flat);
    }

    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for block in body.blocks() {
        *occurrences.entry(block.identifier.as_str()).or_default() += 1;
    }

    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    for block in body.blocks() {
        let identifier = block.identifier.as_str();
        let mut path = join(prefix, identifier);
        if occurrences[identifier] > 1 {
            let position = positions.entry(identifier).or_default();
            path = join(&path, &position.to_string());
            *position += 1;
        }
        flatten_body(&path, &block.body, flat);
    }
}

fn flatten_expr(path: &str, expr: &Expression, flat: &mut BTreeMap<String, String>) {
    match expr {
        Expression::String(value) => {
            flat.insert(path.to_string(), value.clone());
        }
        Expression::Number(value) => {
            flat.insert(path.to_string(), value.to_string());
        }
        Expression::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                flatten_expr(&join(path, &index.to_string()), element, flat);
            }
        }
        other => panic!("unexpected expression at {path}: {other:?}"),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[test]
fn plain_keys_are_root_scalars() {
    let input = flat(&[("ami", "ami-123"), ("instance_type", "t2.micro"), ("count", "2")]);
    let tree = reconstruct(&input).unwrap();

    assert_eq!(tree.len(), input.len());
    for (key, value) in &input {
        assert_eq!(tree[key], AttributeNode::Scalar(value.clone()));
    }
}

#[test]
fn leaf_and_container_conflict() {
    for input in [
        vec![("foo", "1"), ("foo.bar", "2")],
        vec![("foo.bar", "2"), ("foo", "1")],
    ] {
        let err = reconstruct(input).unwrap_err();
        assert!(matches!(err, ReconstructError::StructuralConflict { ref key, .. } if key == "foo"));
    }
}

#[test]
fn hashed_set_renders_as_list() {
    let input = flat(&[("set.#", "2"), ("set.3904355907.", "a"), ("set.1908338681.", "b")]);
    let tree = reconstruct(&input).unwrap();
    let rendered = render("test", "this", &tree).unwrap();

    let body = hcl::parse(&rendered).unwrap();
    let block = body.blocks().next().unwrap();
    assert_eq!(block.body.blocks().count(), 0);

    let attribute = block.body.attributes().next().unwrap();
    assert_eq!(attribute.key.as_str(), "set");
    let Expression::Array(elements) = &attribute.expr else {
        panic!("set must be an array: {:?}", attribute.expr);
    };
    let mut members: Vec<_> = elements
        .iter()
        .map(|element| match element {
            Expression::String(value) => value.as_str(),
            other => panic!("set member must be a string: {other:?}"),
        })
        .collect();
    members.sort();
    assert_eq!(members, vec!["a", "b"]);
}

#[test]
fn nested_single_block() {
    let tree = reconstruct(flat(&[("block.name", "x"), ("block.size", "3")])).unwrap();
    let rendered = render("test", "this", &tree).unwrap();

    let body = hcl::parse(&rendered).unwrap();
    let resource = body.blocks().next().unwrap();
    let nested = resource.body.blocks().next().unwrap();

    assert_eq!(nested.identifier.as_str(), "block");
    let attributes: Vec<_> = nested
        .body
        .attributes()
        .map(|attribute| (attribute.key.as_str(), attribute.expr.clone()))
        .collect();
    assert_eq!(
        attributes,
        vec![
            ("name", Expression::String("x".to_string())),
            ("size", Expression::Number(hcl::Number::from(3u64))),
        ]
    );
}

#[test]
fn render_then_reflatten_round_trips() {
    let input = flat(&[
        ("ami", "ami-123"),
        ("cidr_blocks.#", "2"),
        ("cidr_blocks.0", "10.0.0.0/8"),
        ("cidr_blocks.1", "192.168.0.0/16"),
        ("monitoring", "false"),
        ("tags.%", "2"),
        ("tags.Name", "web1"),
        ("tags.Role", "frontend"),
        ("volume_size", "8"),
    ]);
    let tree = reconstruct(&input).unwrap();
    let rendered = render("aws_instance", "web", &tree).unwrap();

    let body = hcl::parse(&rendered).unwrap();
    let resource = body.blocks().next().unwrap();
    let mut reflattened = BTreeMap::new();
    flatten_body("", &resource.body, &mut reflattened);

    let without_markers: BTreeMap<_, _> = input
        .into_iter()
        .filter(|(key, _)| !key.ends_with(".#") && !key.ends_with(".%"))
        .collect();
    assert_eq!(reflattened, without_markers);
    assert_eq!(flatten(&tree), without_markers);
}

#[test]
fn nested_collections_round_trip() {
    let input = flat(&[
        ("egress.#", "2"),
        ("egress.2541437006.to_port", "8080"),
        ("egress.516175195.to_port", "0"),
        ("ingress.#", "2"),
        ("ingress.0.cidr_blocks.#", "2"),
        ("ingress.0.cidr_blocks.0", "10.0.0.0/8"),
        ("ingress.0.cidr_blocks.1", "192.168.0.0/16"),
        ("ingress.0.from_port", "22"),
        ("ingress.1.cidr_blocks.#", "1"),
        ("ingress.1.cidr_blocks.0", "0.0.0.0/0"),
        ("ingress.1.from_port", "443"),
        ("ingress.1.tags.%", "1"),
        ("ingress.1.tags.Name", "https"),
        ("security_groups.#", "1"),
        ("security_groups.842512562", "sg-123"),
    ]);
    let tree = reconstruct(&input).unwrap();

    let without_markers: BTreeMap<_, _> = input
        .iter()
        .filter(|(key, _)| !key.ends_with(".#") && !key.ends_with(".%"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    assert_eq!(flatten(&tree), without_markers);

    let rendered = render("aws_security_group", "web", &tree).unwrap();
    let body = hcl::parse(&rendered).unwrap();
    let resource = body.blocks().next().unwrap();
    let mut reflattened = BTreeMap::new();
    flatten_body("", &resource.body, &mut reflattened);

    // hashed elements come back by position, in index order
    assert_eq!(
        reflattened,
        flat(&[
            ("egress.0.to_port", "0"),
            ("egress.1.to_port", "8080"),
            ("ingress.0.cidr_blocks.0", "10.0.0.0/8"),
            ("ingress.0.cidr_blocks.1", "192.168.0.0/16"),
            ("ingress.0.from_port", "22"),
            ("ingress.1.cidr_blocks.0", "0.0.0.0/0"),
            ("ingress.1.from_port", "443"),
            ("ingress.1.tags.Name", "https"),
            ("security_groups.0", "sg-123"),
        ])
    );
}

#[test]
fn key_quoting() {
    let tree = reconstruct(flat(&[("1a", "x"), ("name", "y")])).unwrap();
    let rendered = render("test", "this", &tree).unwrap();

    assert!(rendered.contains("\n\"1a\" = \"x\"\n"));
    assert!(rendered.contains("\nname = \"y\"\n"));
}

#[test]
fn end_to_end_single_resource() {
    let state = state2hcl::state! {
        "aws_instance.web" => { "ami" => "ami-123", "tags.Name" => "web1" },
    };
    let generated: Vec<_> = state2hcl::generate(&state).collect();
    assert_eq!(generated.len(), 1);

    let raw = generated[0].result.as_ref().unwrap();
    assert_eq!(
        raw,
        "resource \"aws_instance\" \"web\" {\nami = \"ami-123\"\ntags {\nName = \"web1\"\n}\n}\n"
    );

    let formatted = state2hcl::format::format(raw).unwrap();
    assert_eq!(hcl::parse(&formatted).unwrap(), hcl::parse(raw).unwrap());
    assert!(formatted.contains("\n  ami = \"ami-123\"\n"));
}

#[test]
fn output_is_stable() {
    let input = flat(&[("zeta", "1"), ("alpha.b", "2"), ("alpha.a", "3"), ("mid", "x")]);
    let first = render("t", "n", &reconstruct(&input).unwrap()).unwrap();

    let reversed: Vec<_> = input.iter().rev().collect();
    let second = render("t", "n", &reconstruct(reversed).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn upstream_collections_render_as_lists() {
    let mut tree = Object::new();
    tree.insert("zones".to_string(), vec!["eu-west-1a", "eu-west-1b"].into());

    let rendered = render("t", "n", &tree).unwrap();
    assert!(rendered.contains("zones = [\"eu-west-1a\", \"eu-west-1b\"]\n"));
}
