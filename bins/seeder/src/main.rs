//! Database seeder for Tresor development and testing.
//!
//! Seeds reference data (services, banks, economic natures) and a small
//! set of source records across every report kind, so the engine can be
//! exercised locally right after `migrator fresh`.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tresor_db::entities::{
    banques, comptes_bancaires, demandes_paiement, depenses, paiements, recettes,
    releves_depense, services,
};

/// Fixed IDs so re-runs are idempotent.
const SERVICE_RECOUVREMENT_ID: &str = "00000000-0000-0000-0000-000000000101";
const SERVICE_ORDONNANCEMENT_ID: &str = "00000000-0000-0000-0000-000000000102";
const BANQUE_BCC_ID: &str = "00000000-0000-0000-0000-000000000201";
const COMPTE_BCC_USD_ID: &str = "00000000-0000-0000-0000-000000000301";
const COMPTE_BCC_CDF_ID: &str = "00000000-0000-0000-0000-000000000302";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tresor_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding services...");
    seed_services(&db).await;

    println!("Seeding banks and accounts...");
    seed_banques(&db).await;

    println!("Seeding source records...");
    seed_sources(&db).await;

    println!("Seeding complete!");
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

async fn seed_services(db: &DatabaseConnection) {
    for (service_id, nom, code) in [
        (SERVICE_RECOUVREMENT_ID, "Service du Recouvrement", "REC"),
        (SERVICE_ORDONNANCEMENT_ID, "Service de l'Ordonnancement", "ORD"),
    ] {
        if services::Entity::find_by_id(id(service_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Service {code} already exists, skipping...");
            continue;
        }

        let service = services::ActiveModel {
            id: Set(id(service_id)),
            nom: Set(nom.to_string()),
            code: Set(code.to_string()),
        };
        if let Err(e) = service.insert(db).await {
            eprintln!("Failed to insert service {code}: {e}");
        } else {
            println!("  Created service: {nom}");
        }
    }
}

async fn seed_banques(db: &DatabaseConnection) {
    if banques::Entity::find_by_id(id(BANQUE_BCC_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_none()
    {
        let banque = banques::ActiveModel {
            id: Set(id(BANQUE_BCC_ID)),
            nom: Set("Banque Centrale du Congo".to_string()),
            code: Set("BCC".to_string()),
        };
        if let Err(e) = banque.insert(db).await {
            eprintln!("Failed to insert bank: {e}");
        } else {
            println!("  Created bank: Banque Centrale du Congo");
        }
    }

    for (compte_id, numero, intitule, devise, solde) in [
        (COMPTE_BCC_USD_ID, "00011-00000123-45", "Compte général USD", "USD", dec!(125000.00)),
        (COMPTE_BCC_CDF_ID, "00011-00000123-46", "Compte général CDF", "CDF", dec!(48500000.00)),
    ] {
        if comptes_bancaires::Entity::find_by_id(id(compte_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let compte = comptes_bancaires::ActiveModel {
            id: Set(id(compte_id)),
            banque_id: Set(id(BANQUE_BCC_ID)),
            numero_compte: Set(numero.to_string()),
            intitule: Set(intitule.to_string()),
            devise: Set(devise.to_string()),
            solde_courant: Set(solde),
            updated_at: Set(Utc::now().into()),
        };
        if let Err(e) = compte.insert(db).await {
            eprintln!("Failed to insert account {numero}: {e}");
        } else {
            println!("  Created account: {numero}");
        }
    }
}

#[allow(clippy::too_many_lines)]
async fn seed_sources(db: &DatabaseConnection) {
    let recouvrement = id(SERVICE_RECOUVREMENT_ID);
    let ordonnancement = id(SERVICE_ORDONNANCEMENT_ID);

    let demande = demandes_paiement::ActiveModel {
        id: Set(Uuid::new_v4()),
        numero: Set(format!("DP-{}", Uuid::new_v4().simple())),
        beneficiaire: Set("Imprimerie Saint Paul".to_string()),
        motif: Set("Impression des carnets de quittances".to_string()),
        service_id: Set(ordonnancement),
        nature_economique_id: Set(None),
        devise: Set("USD".to_string()),
        montant: Set(dec!(1850.00)),
        statut: Set("VALIDEE".to_string()),
        date_soumission: Set(d(2024, 6, 10)),
        created_at: Set(Utc::now().into()),
    };
    if let Err(e) = demande.insert(db).await {
        eprintln!("Failed to insert demande: {e}");
    }

    for (numero, libelle, source, usd, cdf, date) in [
        ("REC-0001", "Taxe administrative", "Guichet", Some(dec!(1000.00)), None, d(2024, 6, 10)),
        ("REC-0002", "Redevance minière", "Virement", None, Some(dec!(500000.00)), d(2024, 6, 20)),
    ] {
        let recette = recettes::ActiveModel {
            id: Set(Uuid::new_v4()),
            numero: Set(format!("{numero}-{}", Uuid::new_v4().simple())),
            libelle: Set(libelle.to_string()),
            source: Set(source.to_string()),
            service_id: Set(recouvrement),
            banque_id: Set(Some(id(BANQUE_BCC_ID))),
            montant_usd: Set(usd),
            montant_cdf: Set(cdf),
            date_encaissement: Set(date),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = recette.insert(db).await {
            eprintln!("Failed to insert recette: {e}");
        }
    }

    let depense = depenses::ActiveModel {
        id: Set(Uuid::new_v4()),
        code_depense: Set("641-0021".to_string()),
        libelle: Set("Fournitures de bureau".to_string()),
        service_id: Set(ordonnancement),
        nature_economique_id: Set(None),
        montant_usd: Set(Some(dec!(320.00))),
        montant_fc: Set(None),
        statut: Set("PAYEE".to_string()),
        date_depense: Set(d(2024, 6, 12)),
        created_at: Set(Utc::now().into()),
    };
    if let Err(e) = depense.insert(db).await {
        eprintln!("Failed to insert depense: {e}");
    }

    for (beneficiaire, devise, montant, partiel, date) in [
        ("Imprimerie Saint Paul", "USD", dec!(100.00), false, d(2024, 5, 1)),
        ("Papeterie Moderne", "USD", dec!(50.00), false, d(2024, 5, 1)),
        ("SNEL", "CDF", dec!(70000.00), true, d(2024, 5, 1)),
    ] {
        let paiement = paiements::ActiveModel {
            id: Set(Uuid::new_v4()),
            numero: Set(format!("PAY-{}", Uuid::new_v4().simple())),
            beneficiaire: Set(beneficiaire.to_string()),
            demande_id: Set(None),
            service_id: Set(Some(ordonnancement)),
            banque_id: Set(Some(id(BANQUE_BCC_ID))),
            devise: Set(devise.to_string()),
            montant_paye: Set(montant),
            est_partiel: Set(partiel),
            date_paiement: Set(date),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = paiement.insert(db).await {
            eprintln!("Failed to insert paiement: {e}");
        }
    }

    // Statement anchored to the first of March: a query for any March day
    // must find it.
    let releve = releves_depense::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(ordonnancement),
        libelle: Set("Relevé des dépenses de mars".to_string()),
        periode: Set(d(2024, 3, 1)),
        net_usd: Set(Some(dec!(300.00))),
        net_cdf: Set(None),
        created_at: Set(Utc::now().into()),
    };
    if let Err(e) = releve.insert(db).await {
        eprintln!("Failed to insert releve: {e}");
    }

    println!("  Source records seeded");
}
