//! Canonical beneficiary schema
//!
//! Every imported record is normalized into this closed set of target fields.
//! Each field carries a priority-ordered alias list (Turkish first, then
//! English synonyms) used by the header mapper; earlier aliases win.

use serde::{Deserialize, Serialize};

/// One of the fixed target attributes of a beneficiary record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneficiaryField {
    FirstName,
    LastName,
    Nationality,
    BirthDate,
    Gender,
    BloodType,
    IdentityNumber,
    Email,
    MobilePhone,
    LandlinePhone,
    ForeignPhone,
    Country,
    City,
    District,
    Neighborhood,
    Address,
    Iban,
}

impl BeneficiaryField {
    /// All canonical fields, in schema order
    pub const ALL: [BeneficiaryField; 17] = [
        BeneficiaryField::FirstName,
        BeneficiaryField::LastName,
        BeneficiaryField::Nationality,
        BeneficiaryField::BirthDate,
        BeneficiaryField::Gender,
        BeneficiaryField::BloodType,
        BeneficiaryField::IdentityNumber,
        BeneficiaryField::Email,
        BeneficiaryField::MobilePhone,
        BeneficiaryField::LandlinePhone,
        BeneficiaryField::ForeignPhone,
        BeneficiaryField::Country,
        BeneficiaryField::City,
        BeneficiaryField::District,
        BeneficiaryField::Neighborhood,
        BeneficiaryField::Address,
        BeneficiaryField::Iban,
    ];

    /// Canonical snake_case name, matching the store column name
    pub fn as_str(&self) -> &'static str {
        match self {
            BeneficiaryField::FirstName => "first_name",
            BeneficiaryField::LastName => "last_name",
            BeneficiaryField::Nationality => "nationality",
            BeneficiaryField::BirthDate => "birth_date",
            BeneficiaryField::Gender => "gender",
            BeneficiaryField::BloodType => "blood_type",
            BeneficiaryField::IdentityNumber => "identity_number",
            BeneficiaryField::Email => "email",
            BeneficiaryField::MobilePhone => "mobile_phone",
            BeneficiaryField::LandlinePhone => "landline_phone",
            BeneficiaryField::ForeignPhone => "foreign_phone",
            BeneficiaryField::Country => "country",
            BeneficiaryField::City => "city",
            BeneficiaryField::District => "district",
            BeneficiaryField::Neighborhood => "neighborhood",
            BeneficiaryField::Address => "address",
            BeneficiaryField::Iban => "iban",
        }
    }

    /// Known source-header aliases, highest priority first
    ///
    /// Comparison is exact on the first pass and diacritic/case/whitespace
    /// folded on the second (see [`crate::mapping::fold_header`]), so each
    /// spelling only needs to appear once here.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            BeneficiaryField::FirstName => &["Ad", "Adı", "İsim", "First Name", "Given Name", "Name"],
            BeneficiaryField::LastName => &["Soyad", "Soyadı", "Last Name", "Surname", "Family Name"],
            BeneficiaryField::Nationality => &["Uyruk", "Uyruğu", "Milliyet", "Nationality"],
            BeneficiaryField::BirthDate => &[
                "Doğum Tarihi",
                "Doğum Günü",
                "Birth Date",
                "Date of Birth",
                "Birthdate",
                "DOB",
            ],
            BeneficiaryField::Gender => &["Cinsiyet", "Cinsiyeti", "Gender", "Sex"],
            BeneficiaryField::BloodType => &["Kan Grubu", "Kan Grup", "Blood Type", "Blood Group"],
            BeneficiaryField::IdentityNumber => &[
                "TC Kimlik No",
                "T.C. Kimlik No",
                "Kimlik No",
                "Kimlik Numarası",
                "TC No",
                "Identity Number",
                "National ID",
            ],
            BeneficiaryField::Email => &["E-posta", "Eposta", "Email", "E-mail", "Mail"],
            BeneficiaryField::MobilePhone => &[
                "Cep Telefonu",
                "Cep Tel",
                "GSM",
                "Mobile Phone",
                "Mobile",
                "Telefon",
                "Phone",
            ],
            BeneficiaryField::LandlinePhone => &[
                "Sabit Telefon",
                "Ev Telefonu",
                "Sabit Tel",
                "Landline Phone",
                "Landline",
                "Home Phone",
            ],
            BeneficiaryField::ForeignPhone => &[
                "Yurtdışı Telefon",
                "Yurt Dışı Telefon",
                "Yabancı Telefon",
                "Foreign Phone",
                "International Phone",
            ],
            BeneficiaryField::Country => &["Ülke", "Country"],
            BeneficiaryField::City => &["Şehir", "İl", "City", "Province"],
            BeneficiaryField::District => &["İlçe", "District"],
            BeneficiaryField::Neighborhood => &["Mahalle", "Mahallesi", "Neighborhood", "Neighbourhood"],
            BeneficiaryField::Address => &["Adres", "Adresi", "Açık Adres", "Address"],
            BeneficiaryField::Iban => &["IBAN", "IBAN No", "IBAN Numarası", "Banka Hesabı", "Bank Account"],
        }
    }
}

impl std::fmt::Display for BeneficiaryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BeneficiaryField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BeneficiaryField::ALL
            .iter()
            .find(|field| field.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown field: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_has_no_duplicates() {
        let unique: HashSet<_> = BeneficiaryField::ALL.iter().collect();
        assert_eq!(unique.len(), BeneficiaryField::ALL.len());
    }

    #[test]
    fn test_every_field_has_aliases() {
        for field in BeneficiaryField::ALL {
            assert!(
                !field.aliases().is_empty(),
                "{} has no aliases",
                field.as_str()
            );
        }
    }

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for field in BeneficiaryField::ALL {
            let parsed: BeneficiaryField = field.as_str().parse().unwrap();
            assert_eq!(parsed, field);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("favorite_color".parse::<BeneficiaryField>().is_err());
    }

    #[test]
    fn test_turkish_primary_aliases() {
        assert_eq!(BeneficiaryField::FirstName.aliases()[0], "Ad");
        assert_eq!(BeneficiaryField::LastName.aliases()[0], "Soyad");
        assert_eq!(BeneficiaryField::BirthDate.aliases()[0], "Doğum Tarihi");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&BeneficiaryField::BirthDate).unwrap();
        assert_eq!(json, "\"birth_date\"");
    }
}
