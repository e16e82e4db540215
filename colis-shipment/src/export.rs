use crate::models::Shipment;
use serde::Serialize;

/// Column headers of the carrier import sheet
pub const EXPORT_HEADERS: [&str; 9] = [
    "GAB",
    "ETOILE",
    "CAB1",
    "Nom",
    "Prénom",
    "Code Postal",
    "Ville",
    "Adresse",
    "MS Destinataire",
];

/// One export row per physical package.
///
/// The CAB1 cell carries the concatenation formula instead of a literal so
/// the sheet recomputes `*GAB*` from its own columns; the consumer renders
/// the GAB and CAB1 columns in a Code-39 font.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub gab: String,
    pub etoile: String,
    pub cab1: String,
    pub nom: String,
    pub prenom: String,
    pub code_postal: String,
    pub ville: String,
    pub adresse: String,
    pub ms_destinataire: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No shipments selected for export")]
    NoShipments,

    #[error("Shipments missing barcodes, generate them first: {}", .0.join(", "))]
    MissingBarcodes(Vec<String>),
}

/// Build the export rows for a selection of shipments
pub fn build_rows(shipments: &[&Shipment]) -> Result<Vec<ExportRow>, ExportError> {
    if shipments.is_empty() {
        return Err(ExportError::NoShipments);
    }

    let missing: Vec<String> = shipments
        .iter()
        .filter(|shipment| shipment.packages.is_empty())
        .map(|shipment| shipment.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ExportError::MissingBarcodes(missing));
    }

    let mut rows = Vec::new();
    // Row 1 is the header line; data starts at 2
    let mut row_idx = 2usize;
    for shipment in shipments {
        let (prenom, nom) = shipment.partner.split_name();
        let adresse = shipment.partner.full_address();
        let phone = shipment
            .recipient_phone
            .clone()
            .or_else(|| shipment.partner.contact_number().map(str::to_string))
            .unwrap_or_default();

        for package in &shipment.packages {
            rows.push(ExportRow {
                gab: package.display_code().to_string(),
                etoile: "*".to_string(),
                cab1: format!("=CONCATENATE(B{row_idx},A{row_idx},B{row_idx})"),
                nom: nom.clone(),
                prenom: prenom.clone(),
                code_postal: shipment.partner.zip.clone().unwrap_or_default(),
                ville: shipment.partner.city.clone().unwrap_or_default(),
                adresse: adresse.clone(),
                ms_destinataire: phone.clone(),
            });
            row_idx += 1;
        }
    }

    tracing::info!(rows = rows.len(), "built export rows");
    Ok(rows)
}

/// Render the rows as CSV, header line included
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(
        &EXPORT_HEADERS
            .iter()
            .map(|header| csv_field(header))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for row in rows {
        let fields = [
            &row.gab,
            &row.etoile,
            &row.cab1,
            &row.nom,
            &row.prenom,
            &row.code_postal,
            &row.ville,
            &row.adresse,
            &row.ms_destinataire,
        ];
        out.push_str(
            &fields
                .iter()
                .map(|field| csv_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::SequenceAllocator;
    use crate::service::{NewShipment, ShipmentService};
    use chrono::Utc;
    use colis_core::ProviderKind;
    use colis_shared::{Partner, ShippingPaymentMethod, TransportNature};
    use uuid::Uuid;

    fn service_with_shipment(declared: u32) -> (ShipmentService, Uuid) {
        let mut partner = Partner::new("Amine El Fassi");
        partner.street = Some("12 Rue des Orangers".to_string());
        partner.street2 = Some("Appt 4".to_string());
        partner.zip = Some("20000".to_string());
        partner.city = Some("Casablanca".to_string());
        partner.mobile = Some("0661000000".to_string());

        let mut service = ShipmentService::new(SequenceAllocator::new(1));
        let id = service.create(NewShipment {
            delivery_id: Uuid::new_v4(),
            sale_order_id: None,
            partner,
            carrier_id: Uuid::new_v4(),
            provider: ProviderKind::Barid,
            declared_packages: declared,
            payment_method: ShippingPaymentMethod::default(),
            transport_nature: TransportNature::default(),
            shipping_date: Utc::now().date_naive(),
            reference_from: None,
        });
        (service, id)
    }

    #[test]
    fn test_one_row_per_package_with_formula_cab1() {
        let (mut service, id) = service_with_shipment(2);
        service.generate_packages(id).unwrap();

        let shipment = service.get(id).unwrap();
        let rows = build_rows(&[shipment]).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gab, "LI000000001MA");
        assert_eq!(rows[0].etoile, "*");
        assert_eq!(rows[0].cab1, "=CONCATENATE(B2,A2,B2)");
        assert_eq!(rows[1].cab1, "=CONCATENATE(B3,A3,B3)");
        assert_eq!(rows[0].prenom, "Amine");
        assert_eq!(rows[0].nom, "El Fassi");
        assert_eq!(rows[0].adresse, "12 Rue des Orangers, Appt 4");
        assert_eq!(rows[0].ms_destinataire, "0661000000");
    }

    #[test]
    fn test_export_refuses_shipments_without_packages() {
        let (service, id) = service_with_shipment(1);
        let shipment = service.get(id).unwrap();

        match build_rows(&[shipment]) {
            Err(ExportError::MissingBarcodes(names)) => {
                assert_eq!(names, vec![shipment.name.clone()]);
            }
            other => panic!("expected missing-barcode error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        assert!(matches!(build_rows(&[]), Err(ExportError::NoShipments)));
    }

    #[test]
    fn test_csv_rendering_quotes_embedded_commas() {
        let (mut service, id) = service_with_shipment(1);
        service.generate_packages(id).unwrap();
        let shipment = service.get(id).unwrap();

        let csv = to_csv(&build_rows(&[shipment]).unwrap());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "GAB,ETOILE,CAB1,Nom,Prénom,Code Postal,Ville,Adresse,MS Destinataire"
        );
        let data = lines.next().unwrap();
        // The address contains a comma and must be quoted
        assert!(data.contains("\"12 Rue des Orangers, Appt 4\""));
        assert!(data.starts_with("LI000000001MA,*,"));
    }
}
