use std::fs;
use std::path::Path;

use marxfile::table::ParamValue;
use marxfile::{ElementType, Shape, TableConfig, read_dir_table, read_record};

const MAGIC: [u8; 4] = [131, 19, 137, 141];

fn record(tag: u8, name: &str, rows: i32, cols: i32, payload: &[u8]) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.push(tag);
    let mut field = [0u8; 15];
    field[..name.len()].copy_from_slice(name.as_bytes());
    data.extend_from_slice(&field);
    data.extend_from_slice(&rows.to_be_bytes());
    data.extend_from_slice(&cols.to_be_bytes());
    data.extend_from_slice(&0i32.to_be_bytes());
    data.extend_from_slice(payload);
    data
}

fn write(dir: &Path, file: &str, bytes: &[u8]) {
    fs::write(dir.join(file), bytes).expect("err writing fixture");
}

fn simulation_dir(dir: &Path) {
    let energy: Vec<u8> = [1.49f64, 6.4, 0.277]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let xpos: Vec<u8> = [10.5f32, -2.0, 0.0]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let pha: Vec<u8> = [3i16, 200, -1].iter().flat_map(|v| v.to_be_bytes()).collect();
    let dir_cosines: Vec<u8> = (0..9i32).flat_map(|v| v.to_be_bytes()).collect();

    write(dir, "energy.dat", &record(b'D', "energy", 3, 0, &energy));
    write(dir, "xpos.dat", &record(b'E', "xpos", 3, 0, &xpos));
    write(dir, "pha.dat", &record(b'I', "pha", 3, 0, &pha));
    write(dir, "detector.dat", &record(b'A', "detector", 3, 0, &[0, 1, 2]));
    write(dir, "xcos.dat", &record(b'J', "xcos", 3, 3, &dir_cosines));
    write(
        dir,
        "marx.par",
        b"#\n# MARX run\n#\nSourceType,s,a,\"POINT\",,,\"Source\"\n\
          NumRays,i,a,3,,,\"Rays\"\nSourceRA,r,a,30.5,,,\"RA\"\n\
          DetIdeal,b,a,yes,,,\"Ideal\"\nOutputDir,f,a,\"point\",,,\"Out\"\n",
    );
}

#[test]
fn test_read_simulation_dir() {
    let dir = tempfile::tempdir().expect("err creating temp dir");
    simulation_dir(dir.path());

    let table = read_dir_table(dir.path(), &TableConfig::default()).expect("err reading dir");
    assert_eq!(
        table.names().collect::<Vec<_>>(),
        vec!["detector", "energy", "pha", "xcos", "xpos"]
    );
    assert_eq!(table.len(), 3);

    let xcos = table.column("xcos").unwrap();
    assert_eq!(xcos.element_type(), ElementType::Int32);
    assert_eq!(xcos.shape(), Shape::Matrix { rows: 3, cols: 3 });
    assert_eq!(xcos.value_f64(2, 1), Some(7.0));

    let energy = table.column("energy").unwrap();
    assert_eq!(energy.as_array::<f64>().unwrap().as_slice(), &[1.49, 6.4, 0.277]);

    let meta = table.meta();
    assert_eq!(meta["SourceType"], ParamValue::Text("POINT".into()));
    assert_eq!(meta["NumRays"], ParamValue::Int(3));
    assert_eq!(meta["SourceRA"], ParamValue::Real(30.5));
    assert_eq!(meta["DetIdeal"], ParamValue::Bool(true));
    assert_eq!(meta["OutputDir"], ParamValue::Text("point".into()));
}

#[test]
fn test_selected_columns_to_json() {
    let dir = tempfile::tempdir().unwrap();
    simulation_dir(dir.path());

    let config = TableConfig::default().with_columns(["pha", "time", "detector"]);
    let table = read_dir_table(dir.path(), &config).unwrap();
    let json: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();

    assert_eq!(json["columns"]["pha"], serde_json::json!([3, 200, -1]));
    assert_eq!(json["columns"]["detector"], serde_json::json!([0, 1, 2]));
    assert!(json["columns"].get("time").is_none());
    assert_eq!(json["meta"]["NumRays"], serde_json::json!(3));
}

#[test]
fn test_single_record_file() {
    let dir = tempfile::tempdir().unwrap();
    let payload: Vec<u8> = [7i32, -3].iter().flat_map(|v| v.to_be_bytes()).collect();
    write(dir.path(), "xpos.dat", &record(b'J', "xpos", 2, 0, &payload));

    let rec = read_record(dir.path().join("xpos.dat")).unwrap();
    assert_eq!(rec.name, "xpos");
    assert_eq!(rec.column.as_array::<i32>().unwrap().as_slice(), &[7, -3]);
}
