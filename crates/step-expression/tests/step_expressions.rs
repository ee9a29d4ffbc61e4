//! Behavioural tests for the step expression factory and its conversions.
#![expect(clippy::expect_used, reason = "tests assert conversion paths")]

use std::collections::HashMap;
use std::sync::Arc;

use rstest::{fixture, rstest};
use step_expression::{
    ArgumentConversion, BoxError, CellMap, ConversionError, DataTable, DataTableError,
    DataTableRow, DataTableType, ExpressionConfig, ParameterType, Rows, StepExpression,
    StepExpressionError, StepExpressionFactory, StructuralType, TypeRegistry,
    datatable::{RowSpec, trimmed},
};

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
        .collect()
}

#[fixture]
fn registry() -> Arc<TypeRegistry> {
    Arc::new(TypeRegistry::new())
}

#[fixture]
fn factory() -> StepExpressionFactory {
    StepExpressionFactory::new(Arc::new(TypeRegistry::new()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Person {
    name: String,
    age: u32,
}

impl DataTableRow for Person {
    const REQUIRES_HEADER: bool = true;

    fn parse_row(row: RowSpec<'_>) -> Result<Self, DataTableError> {
        Ok(Self {
            name: row.column("name")?.to_owned(),
            age: row.parse_column_with("age", trimmed)?,
        })
    }
}

fn joined(rows: Vec<Vec<String>>) -> Result<String, BoxError> {
    Ok(rows
        .iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("|"))
}

#[rstest]
fn identity_mode_delegates_matching(factory: StepExpressionFactory) {
    let step = factory
        .create_expression("{name} orders {count:u32} {dish:word}")
        .expect("pattern compiles");
    let arguments = step
        .match_text("Ann orders 3 pies")
        .expect("captures coerce")
        .expect("text matches");
    let texts: Vec<_> = arguments.iter().map(|argument| argument.text()).collect();
    assert_eq!(texts, ["Ann", "3", "pies"]);
    assert_eq!(arguments.get(1).and_then(|a| a.downcast_ref::<u32>()), Some(&3));
    assert!(step.match_text("Ann orders pies").expect("no match").is_none());
}

#[rstest]
#[case("")]
#[case("line one\n  line two\n")]
#[case("{not a placeholder}")]
fn identity_doc_string_is_returned_verbatim(factory: StepExpressionFactory, #[case] text: &str) {
    let step = factory.create_expression("a doc string").expect("pattern compiles");
    let converted: String = step.convert_doc_string_as(text).expect("identity conversion");
    assert_eq!(converted, text);
}

#[rstest]
fn identity_table_keeps_its_shape(factory: StepExpressionFactory) {
    let step = factory.create_expression("a table").expect("pattern compiles");
    let raw = rows(&[&["a", "b", "c"], &["d", "e", "f"]]);
    let table: DataTable = step
        .convert_table_argument_as(raw.clone())
        .expect("identity conversion");
    assert_eq!((table.height(), table.width()), (2, 3));
    assert_eq!(table.into_cells(), raw);
}

#[rstest]
fn missing_pattern_is_an_invalid_argument(factory: StepExpressionFactory) {
    let Err(err) = factory.create_expression(None) else {
        panic!("a missing pattern is rejected");
    };
    assert_eq!(err.to_string(), "expression can not be null");
}

#[rstest]
fn missing_structural_type_is_an_invalid_argument(factory: StepExpressionFactory) {
    let Err(err) = factory.create_typed_expression("a step", None) else {
        panic!("a missing type is rejected");
    };
    assert!(matches!(err, StepExpressionError::InvalidArgument { .. }));
    assert!(factory.create_transposable_expression(None, StructuralType::of::<String>(), true).is_err());
}

#[rstest]
#[case(None)]
#[case(Some(""))]
fn missing_type_name_is_an_invalid_argument(
    factory: StepExpressionFactory,
    #[case] name: Option<&str>,
) {
    let Err(err) = factory.create_named_expression("a step", name, false) else {
        panic!("{name:?} is not a usable type name");
    };
    assert!(matches!(err, StepExpressionError::InvalidArgument { .. }));
}

#[rstest]
fn malformed_patterns_are_reported(factory: StepExpressionFactory) {
    let Err(err) = factory.create_expression("{value:}") else {
        panic!("empty hint is rejected");
    };
    assert!(matches!(err, StepExpressionError::MalformedExpression(_)));
}

#[rstest]
#[case(StructuralType::of::<Vec<Vec<String>>>())]
#[case(StructuralType::of::<Vec<String>>())]
#[case(StructuralType::of::<DataTable>())]
fn structural_transpose_matches_pretransposed_rows(
    factory: StepExpressionFactory,
    #[case] ty: StructuralType,
) {
    let raw = rows(&[&["a", "b", "c"], &["1", "2", "3"]]);
    let flipped = DataTable::create(raw.clone())
        .expect("rows are rectangular")
        .transpose()
        .into_cells();
    let transposing = factory
        .create_transposable_expression("a table", ty, true)
        .expect("pattern compiles");
    let plain = factory
        .create_transposable_expression("a table", ty, false)
        .expect("pattern compiles");
    let lhs = transposing.convert_table_argument(raw).expect("converts");
    let rhs = plain.convert_table_argument(flipped).expect("converts");
    if ty.is::<DataTable>() {
        assert_eq!(lhs.downcast_ref::<DataTable>(), rhs.downcast_ref::<DataTable>());
    } else if ty.is::<Vec<String>>() {
        assert_eq!(lhs.downcast_ref::<Vec<String>>(), rhs.downcast_ref::<Vec<String>>());
        assert_eq!(
            lhs.downcast_ref::<Vec<String>>().map(Vec::len),
            Some(6)
        );
    } else {
        assert_eq!(
            lhs.downcast_ref::<Vec<Vec<String>>>(),
            rhs.downcast_ref::<Vec<Vec<String>>>()
        );
    }
}

#[rstest]
fn structural_rows_parse_through_the_registry(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    registry.define_rows::<Person>();
    let step = factory
        .create_typed_expression("these people", StructuralType::of::<Rows<Person>>())
        .expect("pattern compiles");
    let people: Rows<Person> = step
        .convert_table_argument_as(rows(&[&["name", "age"], &["Ann", "31"], &["Bo", " 7"]]))
        .expect("rows parse");
    assert_eq!(people.len(), 2);
    assert_eq!(
        people.first(),
        Some(&Person {
            name: "Ann".into(),
            age: 31
        })
    );
}

#[rstest]
fn transposed_key_value_table_builds_a_map(factory: StepExpressionFactory) {
    let step = factory
        .create_transposable_expression("the settings", StructuralType::of::<CellMap>(), true)
        .expect("pattern compiles");
    let settings: HashMap<String, String> = step
        .convert_table_argument_as(rows(&[&["colour", "size"], &["red", "L"]]))
        .expect("two rows become two columns");
    assert_eq!(settings.get("size").map(String::as_str), Some("L"));
}

#[rstest]
fn structural_doc_string_equals_single_cell_table(factory: StepExpressionFactory) {
    for transpose in [false, true] {
        let step = factory
            .create_transposable_expression("a note", StructuralType::of::<String>(), transpose)
            .expect("pattern compiles");
        let from_doc: String = step.convert_doc_string_as("hello\nworld").expect("single cell");
        let from_table: String = step
            .convert_table_argument_as(rows(&[&["hello\nworld"]]))
            .expect("single cell");
        assert_eq!(from_doc, from_table);
    }
}

#[rstest]
fn structural_conversion_failures_are_reported(factory: StepExpressionFactory) {
    let step = factory
        .create_typed_expression("a note", StructuralType::of::<String>())
        .expect("pattern compiles");
    let Err(err) = step.convert_table_argument(rows(&[&["a", "b"]])) else {
        panic!("two cells are not one");
    };
    assert!(matches!(
        err,
        StepExpressionError::ConversionFailure(ConversionError::NotSingleCell { height: 1, width: 2 })
    ));

    let step = factory
        .create_typed_expression("a number", StructuralType::of::<u64>())
        .expect("pattern compiles");
    let Err(err) = step.convert_doc_string("12") else {
        panic!("u64 has no structural converter");
    };
    assert!(matches!(
        err,
        StepExpressionError::ConversionFailure(ConversionError::NoConverter { .. })
    ));
}

#[rstest]
fn named_transpose_happens_before_the_transform(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    registry.define_data_table_type(DataTableType::new("joined", joined));
    let transposing = factory
        .create_named_expression("a table", "joined", true)
        .expect("pattern compiles");
    let plain = factory
        .create_named_expression("a table", "joined", false)
        .expect("pattern compiles");
    let raw = rows(&[&["a", "b"], &["c", "d"]]);
    let flipped: String = transposing
        .convert_table_argument_as(raw.clone())
        .expect("transform succeeds");
    let straight: String = plain.convert_table_argument_as(raw).expect("transform succeeds");
    assert_eq!(flipped, "a,c|b,d");
    assert_eq!(straight, "a,b|c,d");
}

#[rstest]
fn named_types_resolve_at_call_time(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    let step = factory
        .create_named_expression("a table", "Summary", false)
        .expect("names resolve lazily");
    let raw = rows(&[&["x", "y"]]);
    let Err(err) = step.convert_table_argument(raw.clone()) else {
        panic!("Summary is not defined yet");
    };
    assert!(matches!(err, StepExpressionError::UndefinedTableType { ref name } if name == "Summary"));

    registry.define_data_table_type(DataTableType::new("Summary", joined));
    let first: String = step.convert_table_argument_as(raw.clone()).expect("now defined");
    assert_eq!(first, "x,y");

    registry.define_data_table_type(DataTableType::new("Summary", |rows: Vec<Vec<String>>| {
        Ok::<_, BoxError>(rows.len())
    }));
    let second: usize = step.convert_table_argument_as(raw).expect("redefined");
    assert_eq!(second, 1);
}

#[rstest]
fn undefined_names_are_reported_for_both_arguments(factory: StepExpressionFactory) {
    let step = factory
        .create_named_expression("a step", "Missing", true)
        .expect("pattern compiles");
    for err in [
        step.convert_doc_string("text").err(),
        step.convert_table_argument(rows(&[&["a"]])).err(),
    ] {
        assert!(
            matches!(err, Some(StepExpressionError::UndefinedTableType { ref name }) if name == "Missing"),
            "got {err:?}"
        );
    }
}

#[rstest]
fn named_doc_strings_become_single_cell_tables(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    registry.define_data_table_type(DataTableType::new("shape", |rows: Vec<Vec<String>>| {
        Ok::<_, BoxError>((rows.len(), rows.first().map_or(0, Vec::len)))
    }));
    let step = factory
        .create_named_expression("a note", "shape", true)
        .expect("pattern compiles");
    let shape: (usize, usize) = step.convert_doc_string_as("text").expect("transform succeeds");
    assert_eq!(shape, (1, 1));
}

#[rstest]
fn named_transform_errors_are_conversion_failures(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    registry.define_data_table_type(DataTableType::rows::<Person>("people"));
    let step = factory
        .create_named_expression("some people", "people", false)
        .expect("pattern compiles");
    let Err(err) = step.convert_table_argument(rows(&[&["name", "age"], &["Ann", "old"]])) else {
        panic!("`old` is not an age");
    };
    assert!(matches!(
        err,
        StepExpressionError::ConversionFailure(ConversionError::Transform { ref type_name, .. })
            if type_name == "people"
    ));
}

#[rstest]
#[case(ArgumentConversion::Identity)]
#[case(ArgumentConversion::Structural { ty: StructuralType::of::<Vec<Vec<String>>>(), transpose: false })]
#[case(ArgumentConversion::Structural { ty: StructuralType::of::<Vec<Vec<String>>>(), transpose: true })]
#[case(ArgumentConversion::Named { name: "Missing".into(), transpose: false })]
#[case(ArgumentConversion::Named { name: "Missing".into(), transpose: true })]
fn uneven_rows_are_malformed_in_every_mode(
    factory: StepExpressionFactory,
    #[case] conversion: ArgumentConversion,
) {
    let step = factory.create("a table", conversion).expect("pattern compiles");
    let Err(err) = step.convert_table_argument(rows(&[&["a", "b"], &["c"]])) else {
        panic!("uneven rows are rejected");
    };
    assert!(
        matches!(
            err,
            StepExpressionError::MalformedTable(DataTableError::UnevenRow {
                row_number: 2,
                expected: 2,
                actual: 1
            })
        ),
        "got {err}"
    );
}

#[rstest]
fn custom_parameter_types_apply_to_new_expressions(
    registry: Arc<TypeRegistry>,
) {
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    registry.define_parameter_type(
        ParameterType::new("flag", "on|off", |raw: &str| Ok::<_, BoxError>(raw == "on"))
            .expect("regex is valid"),
    );
    let step = factory
        .create_expression("the light is {state:flag}")
        .expect("pattern compiles");
    let arguments = step
        .match_text("the light is on")
        .expect("captures coerce")
        .expect("text matches");
    assert_eq!(arguments.first().and_then(|a| a.downcast_ref::<bool>()), Some(&true));
    assert!(step.match_text("the light is dim").expect("no match").is_none());
}

#[rstest]
#[case(true)]
#[case(false)]
fn strict_parameter_types_follow_the_registry_config(#[case] strict: bool) {
    let registry = TypeRegistry::with_config(ExpressionConfig {
        strict_parameter_types: strict,
    });
    let factory = StepExpressionFactory::new(Arc::new(registry));
    let compiled = factory.create_expression("costs {amount:Money}");
    if strict {
        assert!(matches!(compiled, Err(StepExpressionError::MalformedExpression(_))));
        return;
    }
    let step = compiled.expect("unknown hints capture text");
    let arguments = step
        .match_text("costs 5 EUR")
        .expect("text captures never fail")
        .expect("text matches");
    assert_eq!(arguments.first().map(|a| a.text()), Some("5 EUR"));
}

const fn assert_send_sync<T: Send + Sync>() {}
const _: () = assert_send_sync::<StepExpression>();
const _: () = assert_send_sync::<StepExpressionFactory>();

#[test]
fn named_expressions_convert_from_many_threads() {
    let registry = Arc::new(TypeRegistry::new());
    let factory = StepExpressionFactory::new(Arc::clone(&registry));
    let step = factory
        .create_named_expression("a table", "width", true)
        .expect("pattern compiles");
    registry.define_data_table_type(DataTableType::new("width", |rows: Vec<Vec<String>>| {
        Ok::<_, BoxError>(rows.first().map_or(0, Vec::len))
    }));

    let step = &step;
    let widths: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    (0..100)
                        .map(|_| {
                            step.convert_table_argument_as::<usize>(rows(&[
                                &["a"],
                                &["b"],
                                &["c"],
                            ]))
                            .expect("width is defined")
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("conversion thread panicked"))
            .collect()
    });
    assert_eq!(widths.len(), 800);
    assert!(widths.iter().all(|&width| width == 3));
}
