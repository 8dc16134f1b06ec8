use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pretty_assertions::assert_eq;

use ifc_compressor::{
    compress, compress_table, rewrite_material_names, suggest_replacements, ReferenceDatabase,
    ReplacementMap,
};

const HEADER: &str = "Typ;Material;Volumen_m3;Flaeche_m2;Total_CO2;Total_Cost";

const BETON_WALL: &str = "ISO-10303-21;
HEADER;
FILE_NAME('wall.ifc','2024-01-01T00:00:00',(''),(''),'','','');
ENDSEC;
DATA;
#10=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wand',$,$,$,$,$,$);
#20=IFCMATERIAL('Beton',$,$);
#30=IFCQUANTITYVOLUME('NetVolume',$,$,6.,$);
#31=IFCQUANTITYAREA('NetArea',$,$,3.,$);
#32=IFCELEMENTQUANTITY('1',$,'Qto_WallBaseQuantities',$,$,(#30,#31));
#40=IFCRELDEFINESBYPROPERTIES('2',$,$,$,(#10),#32);
#50=IFCRELASSOCIATESMATERIAL('3',$,$,$,(#10),#20);
ENDSEC;
END-ISO-10303-21;
";

const LAYERED_WALL: &str = "ISO-10303-21;
DATA;
#10=IFCWALLSTANDARDCASE('a',$,'Aussenwand',$,$,$,$,$,$);
#20=IFCMATERIAL('Beton',$,$);
#21=IFCMATERIAL('Ziegel',$,$);
#22=IFCMATERIAL('Mineralwolle',$,$);
#23=IFCMATERIALLAYER(#21,100.,$);
#24=IFCMATERIALLAYER(#22,300.,$);
#25=IFCMATERIALLAYERSET((#23,#24),'AW',$);
#26=IFCMATERIALLAYERSETUSAGE(#25,.AXIS2.,.POSITIVE.,0.,$);
#30=IFCQUANTITYVOLUME('GrossVolume',$,$,8.,$);
#31=IFCQUANTITYAREA('GrossSideArea',$,$,4.,$);
#32=IFCELEMENTQUANTITY('q',$,'Qto',$,$,(#30,#31));
#40=IFCRELDEFINESBYPROPERTIES('r',$,$,$,(#10),#32);
#50=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#10),#20);
#51=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#10),#26);
ENDSEC;
END-ISO-10303-21;
";

fn map(pairs: &[(&str, &str)]) -> ReplacementMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn wall_is_valued_from_best_database_match() {
    let db = ReferenceDatabase::defaults();
    assert_eq!(
        compress(BETON_WALL, &db, None),
        format!("{HEADER}\nWall;Beton;6;3;1920;1680")
    );
}

#[test]
fn layer_set_wins_over_plain_material() {
    let db = ReferenceDatabase::defaults();
    assert_eq!(
        compress(LAYERED_WALL, &db, None),
        format!("{HEADER}\nWall;Mineralwolle;6;3;270;540\nWall;Ziegel;2;1;320;500")
    );
}

#[test]
fn replacement_map_only_values_mapped_materials() {
    let db = ReferenceDatabase::defaults();
    let replacements = map(&[("Ziegel", "Mauerwerk Kalksandstein")]);

    assert_eq!(
        compress(LAYERED_WALL, &db, Some(&replacements)),
        format!("{HEADER}\nWall;Mauerwerk Kalksandstein;2;1;360;440\nWall;Mineralwolle;6;3;0;0")
    );
}

#[test]
fn unmatched_material_has_zero_totals() {
    let db = ReferenceDatabase::defaults();
    let ifc = BETON_WALL.replace("'Beton'", "'Kupfer'");
    assert_eq!(
        compress(&ifc, &db, None),
        format!("{HEADER}\nWall;Kupfer;6;3;0;0")
    );
}

#[test]
fn element_without_material_is_not_defined() {
    let db = ReferenceDatabase::defaults();
    let ifc = "DATA;\n#1=IFCCOLUMN('c',$,$,$,$,$,$,$);\nENDSEC;";
    assert_eq!(
        compress(ifc, &db, None),
        format!("{HEADER}\nColumn;Nicht definiert;0;0;0;0")
    );
}

#[test]
fn rewritten_file_compresses_under_new_name() {
    let db = ReferenceDatabase::defaults();
    let suggestions = suggest_replacements(BETON_WALL, &db);
    assert_eq!(suggestions.len(), 1);

    let approved = map(&[("Beton", "Stahlbeton C25/30")]);
    let rewritten = rewrite_material_names(BETON_WALL, &approved);
    assert!(rewritten.contains("#20=IFCMATERIAL('Stahlbeton C25/30',$,$);"));
    assert!(rewritten.contains("'Wand'"));

    assert_eq!(
        compress(&rewritten, &db, None),
        format!("{HEADER}\nWall;Stahlbeton C25/30;6;3;1920;1680")
    );
}

#[test]
fn compact_model_goes_through_same_decomposition() {
    let db = ReferenceDatabase::defaults();
    let json = r#"{
        "elements": [ {
            "id": 1, "type": "IfcWall", "volume": 10.0, "area": 2.0,
            "materials": [
                { "kind": "material", "name": "Beton" },
                { "kind": "constituentSet", "constituents": [
                    { "name": "Ziegel", "fraction": 0.5 },
                    { "name": "Gips" },
                    { "name": "Gips" } ] } ] } ]
    }"#;
    let replacements = map(&[("Gips", "Gipskarton")]);

    assert_eq!(
        compress(json, &db, Some(&replacements)),
        format!("{HEADER}\nWall;Gipskarton;5;1;1200;1550\nWall;Ziegel;5;1;0;0")
    );
}

#[test]
fn malformed_compact_element_does_not_hide_the_rest() {
    let db = ReferenceDatabase::defaults();
    let json = r#"{"elements":[
        {"id":1,"type":"IfcWall","volume":6.0,"area":3.0,"materials":[{"kind":"material","name":"Beton"}]},
        {"id":2,"volume":1.0},
        {"id":3,"type":"IfcSlab","volume":2.0,"materials":null},
        {"id":4,"type":"IfcBeam","volume":1.0,"materials":[{"name":"Beton"}]}
    ]}"#;

    assert_eq!(
        compress(json, &db, None),
        format!(
            "{HEADER}\nBeam;Unbekannt;1;0;0;0\nSlab;Nicht definiert;2;0;0;0\nWall;Beton;6;3;1920;1680"
        )
    );
}

#[test]
fn data_uri_is_decoded() {
    let db = ReferenceDatabase::defaults();
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        STANDARD.encode(BETON_WALL)
    );
    assert_eq!(compress(&uri, &db, None), compress(BETON_WALL, &db, None));
}

#[test]
fn unrecognized_input_is_returned_unchanged() {
    let db = ReferenceDatabase::defaults();
    assert!(compress_table("not a model", &db, None).is_none());
    assert_eq!(compress("not a model", &db, None), "not a model");
}

#[test]
fn database_file_extends_defaults() {
    let mut db = ReferenceDatabase::defaults();
    let csv = "name;gwp;preis\nKupfer;2500;12000\nZiegel;170;\n";
    let added = db
        .merge_delimited(csv.as_bytes())
        .expect("valid reference rows");
    assert_eq!(added, 2);

    let ifc = BETON_WALL.replace("'Beton'", "'Kupfer'");
    assert_eq!(
        compress(&ifc, &db, None),
        format!("{HEADER}\nWall;Kupfer;6;3;15000;72000")
    );
    assert_eq!(db.get("Ziegel").map(|m| m.price_per_m3), Some(250.0));
}
