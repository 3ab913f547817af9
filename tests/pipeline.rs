mod common;

use common::{TestWorkspace, default_builder};
use encoding_rs::WINDOWS_1251;
use price_finder::{
    aliases::ColumnAliasTable,
    catalog::{CatalogBuilder, UnitPrice},
    discovery::DiscoveryRules,
    error::PriceError,
    normalize::{CanonicalRow, SourceFormat},
    query::Session,
};

fn names(session: &Session) -> Vec<String> {
    session
        .last_result()
        .expect("result present")
        .entries
        .iter()
        .map(|entry| entry.row.row.name.clone())
        .collect()
}

#[test]
fn single_file_produces_canonical_row_with_unit_price() {
    let ws = TestWorkspace::new();
    ws.write("price1.csv", "Наименование,цена,вес\nЯблоко,100,2\n");

    let (catalog, report) = default_builder().build_from_dir(ws.path()).unwrap();
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.rows_loaded, 1);
    let row = &catalog.rows()[0];
    assert_eq!(
        row.row,
        CanonicalRow {
            name: "Яблоко".to_string(),
            price: Some(100.0),
            weight: Some(2.0),
            source_file: "price1.csv".to_string(),
        }
    );
    assert_eq!(row.unit_price, UnitPrice::Defined(50.0));
}

#[test]
fn files_with_different_schemas_merge_and_rank_by_unit_price() {
    let ws = TestWorkspace::new();
    ws.write(
        "price_a.csv",
        "№,товар,розница,фасовка,поставщик\n1,Яблоко Ренет,120,3,ООО Сад\n",
    );
    ws.write("price_b.csv", "Масса,Цена,ПРОДУКТ\n2,90,Яблоко Голден\n");

    let mut session = Session::new();
    session.load(&default_builder(), ws.path()).unwrap();
    let result = session.search("яблоко").unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.entries[0].row.unit_price, UnitPrice::Defined(40.0));
    assert_eq!(result.entries[0].row.row.source_file, "price_a.csv");
    assert_eq!(result.entries[1].row.unit_price, UnitPrice::Defined(45.0));
    assert_eq!(names(&session), vec!["Яблоко Ренет", "Яблоко Голден"]);
}

#[test]
fn catalog_keeps_file_order_then_row_order() {
    let ws = TestWorkspace::new();
    ws.write("price_2.csv", "товар,цена,вес\nв,1,1\nг,1,1\n");
    ws.write("price_1.csv", "товар,цена,вес\nа,1,1\nб,1,1\n");

    let (catalog, _) = default_builder().build_from_dir(ws.path()).unwrap();
    let order: Vec<_> = catalog.rows().iter().map(|r| r.row.name.as_str()).collect();
    assert_eq!(order, vec!["а", "б", "в", "г"]);

    let mut session = Session::with_catalog(catalog);
    session.search("").unwrap();
    assert_eq!(names(&session), vec!["а", "б", "в", "г"]);
}

#[test]
fn zero_and_missing_weights_sort_last_without_unit_price() {
    let ws = TestWorkspace::new();
    ws.write(
        "price.csv",
        "товар,цена,вес\nКрупа весовая,50,0\nКрупа,80,1\nКрупа без веса,10,\n",
    );

    let (catalog, report) = default_builder().build_from_dir(ws.path()).unwrap();
    assert_eq!(report.rows_without_unit_price, 2);
    let mut session = Session::with_catalog(catalog);
    let result = session.search("крупа").unwrap();
    assert_eq!(result.entries[0].row.unit_price, UnitPrice::Defined(80.0));
    assert!(
        result.entries[1..]
            .iter()
            .all(|entry| entry.row.unit_price == UnitPrice::Undefined)
    );
    assert_eq!(names(&session), vec!["Крупа", "Крупа весовая", "Крупа без веса"]);
}

#[test]
fn malformed_file_is_skipped_and_reported() {
    let ws = TestWorkspace::new();
    ws.write("price_bad.csv", "товар,цена,вес\nСахар,70\nСоль,20,1,лишнее\n");
    ws.write("price_good.csv", "товар,цена,вес\nМука,60,2\n");

    let (catalog, report) = default_builder().build_from_dir(ws.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(report.skipped_files.len(), 1);
    assert_eq!(report.skipped_files[0].0, "price_bad.csv");
}

#[test]
fn file_without_recognized_columns_contributes_nothing() {
    let ws = TestWorkspace::new();
    ws.write("price_other.csv", "sku,amount\n1,2\n");
    ws.write("price_ok.csv", "название,цена\nСоль,20\n");

    let (catalog, report) = default_builder().build_from_dir(ws.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(report.skipped_files.is_empty());
}

#[test]
fn directory_without_marked_files_is_a_configuration_error() {
    let ws = TestWorkspace::new();
    ws.write("catalog.csv", "товар,цена,вес\nМука,60,2\n");
    ws.write("price.txt", "товар,цена,вес\nМука,60,2\n");

    let mut session = Session::new();
    let err = session.load(&default_builder(), ws.path()).unwrap_err();
    match err {
        PriceError::Configuration(message) => {
            assert!(message.contains("no price lists found"));
            assert!(message.contains("'price'"));
            assert!(message.contains("наименование"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(matches!(
        session.search("мука"),
        Err(PriceError::UninitializedCatalog)
    ));
}

#[test]
fn files_without_usable_rows_are_a_configuration_error() {
    let ws = TestWorkspace::new();
    ws.write("price_1.csv", "sku,amount\n1,2\n");
    ws.write("price_2.csv", "товар,цена,вес\n");

    let err = default_builder().build_from_dir(ws.path()).unwrap_err();
    assert!(err.to_string().contains("no usable rows"));
}

#[test]
fn legacy_encoded_price_list_loads_with_configured_encoding() {
    let ws = TestWorkspace::new();
    let (bytes, _, _) = WINDOWS_1251.encode("Товар;Цена;Вес\nГречка;90;0,9\n");
    ws.write_bytes("PRICE_1251.CSV", &bytes);

    let builder = CatalogBuilder::new(
        ColumnAliasTable::default(),
        SourceFormat {
            delimiter: b';',
            encoding: WINDOWS_1251,
        },
        DiscoveryRules::default(),
    );
    let (catalog, _) = builder.build_from_dir(ws.path()).unwrap();
    assert_eq!(catalog.rows()[0].row.name, "Гречка");
    assert_eq!(catalog.rows()[0].unit_price, UnitPrice::Defined(100.0));

    let err = default_builder().build_from_dir(ws.path()).unwrap_err();
    assert!(matches!(err, PriceError::Configuration(_)));
}

#[test]
fn alias_file_replaces_builtin_synonyms() {
    let ws = TestWorkspace::new();
    let alias_path = ws.write(
        "aliases.yaml",
        "name: [Item, Product]\nprice: [Cost]\nweight: [KG]\n",
    );
    ws.write("price_en.csv", "product,cost,kg,notes\nRice,30,1.5,long grain\n");

    let aliases = ColumnAliasTable::load(&alias_path).unwrap();
    let builder = CatalogBuilder::new(aliases, SourceFormat::default(), DiscoveryRules::default());
    let mut session = Session::new();
    session.load(&builder, ws.path()).unwrap();
    let result = session.search("RICE").unwrap();
    assert_eq!(result.entries[0].row.unit_price, UnitPrice::Defined(20.0));
}
