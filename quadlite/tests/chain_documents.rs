// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Chains and quads loaded from files

#[cfg(test)]
mod chain_documents {
    use quadlite::gremlin::ChainError;
    use quadlite::{build_iterator_tree, Chain, ChainBuilder, Compiler, CompilerConfig, Evaluator, MemStore};
    use std::fs::File;
    use std::io::{BufReader, Write};
    use tempfile::NamedTempFile;

    const QUADS: &str = "\
# social graph
alice knows bob .
bob knows carol .
alice knows dave people .
";

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    fn load_store() -> MemStore {
        let file = write_temp(QUADS);
        let mut store = MemStore::new();
        let reader = BufReader::new(File::open(file.path()).expect("Failed to open quads"));
        let added = store.load_quads(reader).expect("Failed to load quads");
        assert_eq!(added, 3);
        store
    }

    #[test]
    fn test_compile_chain_from_file() {
        let store = load_store();
        let chain_file = write_temp(
            r#"{
                "steps": [
                    {"kind": {"type": "vertex", "args": ["bob"]}},
                    {"kind": {"type": "vertex", "args": ["alice"]}},
                    {"kind": {"type": "out", "args": ["knows", "via"]}, "prev": 1},
                    {"kind": {"type": "except", "args": [{"chain": 0}]}, "prev": 2}
                ]
            }"#,
        );

        let (chain, tip) = Chain::from_reader(File::open(chain_file.path()).unwrap()).unwrap();
        assert_eq!(tip.0, 3);

        let tree = build_iterator_tree(&chain, tip, &store).unwrap();
        let rows = Evaluator::new(&store).evaluate(&tree).unwrap();
        assert_eq!(rows.len(), 1);
        let (value, tags) = rows[0].resolve(&store);
        assert_eq!(value, "dave");
        assert_eq!(tags["via"], "knows");
    }

    #[test]
    fn test_saved_chain_compiles_identically() {
        let store = load_store();
        let mut builder = ChainBuilder::new();
        let tip = builder
            .vertex(&["alice"])
            .tag(&["start"])
            .out(["knows"])
            .back("start")
            .id();
        let chain = builder.build();

        let file = write_temp(&chain.to_json(tip).unwrap());
        let (loaded, loaded_tip) = Chain::from_reader(File::open(file.path()).unwrap()).unwrap();

        assert_eq!(
            build_iterator_tree(&chain, tip, &store).unwrap(),
            build_iterator_tree(&loaded, loaded_tip, &store).unwrap()
        );
    }

    #[test]
    fn test_rejects_cyclic_documents() {
        let file = write_temp(
            r#"{"steps": [
                {"kind": {"type": "out", "args": []}, "prev": 1},
                {"kind": {"type": "vertex", "args": []}}
            ]}"#,
        );
        let err = Chain::from_reader(File::open(file.path()).unwrap()).unwrap_err();
        assert!(matches!(err, ChainError::ForwardReference { .. }));
    }

    #[test]
    fn test_config_file_limits_depth() {
        let store = load_store();
        let config_file = write_temp(r#"{"max_depth": 2}"#);
        let config = CompilerConfig::from_file(config_file.path()).unwrap();

        let mut builder = ChainBuilder::new();
        let tip = builder.vertex(&["alice"]).out(["knows"]).out(["knows"]).id();
        let chain = builder.build();

        assert!(Compiler::with_config(&store, config).compile(&chain, tip).is_err());
    }
}
