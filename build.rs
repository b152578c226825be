use std::collections::HashSet;
use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/diseases.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the disease catalog before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    assert!(
        catalog.get("version").and_then(|v| v.as_str()).is_some(),
        "\n\nCATALOG BUILD ERROR: Missing 'version' string\n"
    );

    let diseases = catalog.get("diseases").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'diseases' field\n\
             The catalog must have a top-level 'diseases' array.\n"
        );
    });

    let diseases = diseases.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'diseases' must be an array\n\
             Got: {diseases}\n"
        );
    });

    assert!(
        !diseases.is_empty(),
        "\n\nCATALOG BUILD ERROR: The embedded catalog must list at least one disease\n"
    );

    let vocabulary: Option<HashSet<&str>> = catalog
        .get("vocabulary")
        .and_then(|v| v.as_array())
        .map(|symptoms| symptoms.iter().filter_map(|s| s.as_str()).collect());

    let total_symptoms = validate_diseases(diseases, vocabulary.as_ref());

    println!(
        "cargo:warning=Validated catalog: {} diseases, {total_symptoms} symptom links",
        diseases.len()
    );
}

fn validate_diseases(diseases: &[serde_json::Value], vocabulary: Option<&HashSet<&str>>) -> usize {
    let mut seen_names = HashSet::new();
    let mut total_symptoms = 0;

    for (i, disease) in diseases.iter().enumerate() {
        let name = disease
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| {
                panic!("\n\nCATALOG BUILD ERROR: Disease at index {i} missing 'name' string\n")
            });

        assert!(
            !name.trim().is_empty(),
            "\n\nCATALOG BUILD ERROR: Disease at index {i} has an empty name\n"
        );
        assert!(
            seen_names.insert(name),
            "\n\nCATALOG BUILD ERROR: Duplicate disease name '{name}' (index {i})\n"
        );

        total_symptoms += validate_disease_symptoms(disease, name, vocabulary);

        assert!(
            disease.get("treatment").and_then(|t| t.as_array()).is_some(),
            "\n\nCATALOG BUILD ERROR: Disease '{name}' missing 'treatment' array\n"
        );
    }

    total_symptoms
}

fn validate_disease_symptoms(
    disease: &serde_json::Value,
    name: &str,
    vocabulary: Option<&HashSet<&str>>,
) -> usize {
    let symptoms = disease
        .get("symptoms")
        .and_then(|s| s.as_array())
        .unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: Disease '{name}' missing 'symptoms' array\n")
        });

    // A disease without symptoms can never be suggested
    assert!(
        !symptoms.is_empty(),
        "\n\nCATALOG BUILD ERROR: Disease '{name}' has no symptoms\n"
    );

    for symptom in symptoms {
        let symptom = symptom.as_str().unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: Disease '{name}' has a non-string symptom\n")
        });
        if let Some(vocabulary) = vocabulary {
            assert!(
                vocabulary.contains(symptom),
                "\n\nCATALOG BUILD ERROR: Disease '{name}' uses symptom '{symptom}' \
                 which is not in the vocabulary\n"
            );
        }
    }

    symptoms.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/diseases.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
