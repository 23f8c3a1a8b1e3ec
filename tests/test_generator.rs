use tracemap::{BuildError, Mapping, SourceMapGenerator};

#[test]
fn test_simple_generator() {
    let mut generator = SourceMapGenerator::new();
    generator.set_file("compiled.js");
    let stdin = "<stdin>";
    generator.add_mapping(Mapping::new(0, 0).with_source(stdin, 0, 0));
    generator.add_mapping(Mapping::new(1, 0).with_source(stdin, 0, 1));
    generator.add_mapping(Mapping::new(1, 3).with_source(stdin, 0, 2));
    generator.add_mapping(Mapping::new(2, 0).with_source(stdin, 0, 3));

    let payload = generator.generate();
    assert!(payload.mappings.starts_with("AAAA;AAAC,GAAC;AAAC"));
    assert_eq!(payload.line_count, Some(3));
    insta::assert_snapshot!(
        payload.to_string().unwrap(),
        @r###"{"version":3,"file":"compiled.js","lineCount":3,"sources":["<stdin>"],"mappings":"AAAA;AAAC,GAAC;AAAC;"}"###
    );
}

#[test]
fn test_insertion_order_is_irrelevant() {
    let sorted = {
        let mut generator = SourceMapGenerator::new();
        generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
        generator.add_mapping(Mapping::new(0, 7).with_source("a.js", 0, 9));
        generator.add_mapping(Mapping::new(3, 2).with_source("b.js", 1, 0));
        generator.generate()
    };
    let shuffled = {
        let mut generator = SourceMapGenerator::new();
        generator.add_mapping(Mapping::new(3, 2).with_source("b.js", 1, 0));
        generator.add_mapping(Mapping::new(0, 7).with_source("a.js", 0, 9));
        generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
        generator.generate()
    };

    assert_eq!(sorted, shuffled);
}

#[test]
fn test_generate_is_repeatable() {
    let mut generator = SourceMapGenerator::new();
    generator.set_file("out.js");
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0).with_name("n"));
    generator.add_mapping(Mapping::new(2, 4).with_source("b.js", 1, 1));

    let first = generator.generate();
    let second = generator.generate();
    assert_eq!(first, second);
    assert_eq!(
        first.to_vec().unwrap(),
        second.to_vec().unwrap()
    );
}

#[test]
fn test_insufficient_mappings_are_dropped() {
    let mut generator = SourceMapGenerator::new();
    generator.add_mapping(Mapping::new(5, 5));
    generator.add_mapping(Mapping::new(6, 0).with_name("orphan"));

    let payload = generator.generate();
    assert_eq!(payload.mappings, ";");
    assert_eq!(payload.line_count, Some(0));
    assert!(payload.sources.is_empty());
    assert!(payload.names.is_empty());
}

#[test]
fn test_lines_without_mappings_are_closed() {
    let mut generator = SourceMapGenerator::new();
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
    generator.add_mapping(Mapping::new(3, 0).with_source("a.js", 1, 0));

    let payload = generator.generate();
    // the +1 source-line delta lands in the third field
    assert_eq!(payload.mappings, "AAAA;;;AACA;");
    assert_eq!(payload.line_count, Some(4));
}

#[test]
fn test_duplicate_generated_positions_collapse() {
    let mut generator = SourceMapGenerator::new();
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 5));
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 2));

    // ties break deterministically: the first in total order wins
    let payload = generator.generate();
    assert_eq!(payload.mappings, "AAAE;");
}

#[test]
fn test_name_interning() {
    let mut generator = SourceMapGenerator::new();
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0).with_name("z"));
    generator.add_mapping(Mapping::new(0, 3).with_source("a.js", 0, 1).with_name("y"));
    generator.add_mapping(Mapping::new(0, 6).with_source("a.js", 0, 2).with_name("z"));

    let payload = generator.generate();
    // names are emitted in first-seen order, not alphabetical
    assert_eq!(payload.names, ["z", "y"]);
    assert_eq!(payload.mappings, "AAAAA,GAACC,GAACD;");
}

#[test]
fn test_sources_content_alignment() {
    let mut generator = SourceMapGenerator::new();
    generator.set_file("out.js");
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
    generator.add_mapping(Mapping::new(0, 4).with_source("b.js", 0, 0));
    generator.add_sources_content("b.js", "let b=1").unwrap();

    let payload = generator.generate();
    assert_eq!(
        payload.sources_content,
        Some(vec![None, Some("let b=1".to_owned())])
    );
    insta::assert_snapshot!(
        payload.to_string().unwrap(),
        @r###"{"version":3,"file":"out.js","lineCount":1,"sources":["a.js","b.js"],"sourcesContent":[null,"let b=1"],"mappings":"AAAA,ICAA;"}"###
    );
}

#[test]
fn test_duplicate_sources_content_is_rejected() {
    let mut generator = SourceMapGenerator::new();
    generator.add_sources_content("a.js", "let a=1").unwrap();
    assert!(matches!(
        generator.add_sources_content("a.js", "let a=2"),
        Err(BuildError::DuplicateSourceContent(..))
    ));
}

#[test]
fn test_reset() {
    let mut generator = SourceMapGenerator::new();
    generator.set_file("out.js");
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));
    generator.add_sources_content("a.js", "let a=1").unwrap();
    generator.reset();

    let payload = generator.generate();
    assert_eq!(payload.mappings, ";");
    assert!(payload.sources.is_empty());
    assert_eq!(payload.sources_content, None);
    // the file setting survives a reset
    assert_eq!(payload.file.as_deref(), Some("out.js"));
}

#[test]
fn test_starting_position_offset() {
    let mut generator = SourceMapGenerator::new();
    generator.set_starting_position(2, 10);
    generator.add_mapping(Mapping::new(0, 3).with_source("a.js", 0, 0));
    generator.add_mapping(Mapping::new(1, 4).with_source("a.js", 0, 1));

    let payload = generator.generate();
    // line 0 columns shift by the starting column, later lines only by lines
    assert_eq!(payload.mappings, ";;aAAA;IAAC;");
    assert_eq!(payload.line_count, Some(4));
}

#[test]
fn test_wrapper_prefix_extends_line_count() {
    let mut generator = SourceMapGenerator::new();
    generator.set_wrapper_prefix("/* banner */\n");
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));

    assert_eq!(generator.generate().line_count, Some(2));
}

#[test]
fn test_line_count_override() {
    let mut generator = SourceMapGenerator::new();
    generator.set_line_count(10);
    generator.add_mapping(Mapping::new(0, 0).with_source("a.js", 0, 0));

    assert_eq!(generator.generate().line_count, Some(10));
}
