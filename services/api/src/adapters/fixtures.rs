//! services/api/src/adapters/fixtures.rs
//!
//! Fixed-latency stand-ins for the AI tools, plus the static taxonomy tree.
//! They implement the same ports a real model backend would.

use std::time::Duration;

use async_trait::async_trait;
use oceanus_core::domain::{
    ClassNode, DnaMatch, FamilyNode, OrderNode, PhylumNode, SpeciesCandidate, SpeciesPrediction,
    TaxonomyTree,
};
use oceanus_core::ports::{DnaMatcher, PortError, PortResult, SpeciesClassifier};
use tracing::debug;

pub struct FixtureSpeciesClassifier {
    latency: Duration,
}

impl FixtureSpeciesClassifier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SpeciesClassifier for FixtureSpeciesClassifier {
    async fn predict_species(&self, image: &[u8]) -> PortResult<SpeciesPrediction> {
        if image.is_empty() {
            return Err(PortError::Validation("Image required".to_string()));
        }
        debug!("Classifying image of {} bytes", image.len());
        tokio::time::sleep(self.latency).await;

        Ok(SpeciesPrediction {
            species: "Sebastes mystinus".to_string(),
            common_name: "Blue Rockfish".to_string(),
            confidence: 0.94,
            alternates: vec![
                candidate("Sebastes flavidus", "Yellowtail Rockfish", 0.78),
                candidate("Sebastes serranoides", "Olive Rockfish", 0.65),
            ],
        })
    }
}

pub struct FixtureDnaMatcher {
    latency: Duration,
}

impl FixtureDnaMatcher {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl DnaMatcher for FixtureDnaMatcher {
    async fn match_sequence(&self, sequence: &str) -> PortResult<Vec<DnaMatch>> {
        if sequence.trim().is_empty() {
            return Err(PortError::Validation("DNA sequence required".to_string()));
        }
        debug!("Matching sequence of {} bases", sequence.trim().len());
        tokio::time::sleep(self.latency).await;

        let mut matches = vec![
            dna_match("Thunnus thynnus", "Atlantic Bluefin Tuna", 98.5),
            dna_match("Thunnus orientalis", "Pacific Bluefin Tuna", 97.2),
            dna_match("Thunnus maccoyii", "Southern Bluefin Tuna", 96.8),
        ];
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(matches)
    }
}

pub fn taxonomy_tree() -> TaxonomyTree {
    TaxonomyTree {
        kingdom: "Animalia".to_string(),
        children: vec![PhylumNode {
            phylum: "Chordata".to_string(),
            children: vec![ClassNode {
                class: "Actinopterygii".to_string(),
                children: vec![OrderNode {
                    order: "Perciformes".to_string(),
                    children: vec![
                        family("Scombridae", &["Thunnus thynnus", "Katsuwonus pelamis"]),
                        family("Carangidae", &["Seriola dumerili", "Caranx hippos"]),
                    ],
                }],
            }],
        }],
    }
}

fn candidate(species: &str, common_name: &str, confidence: f64) -> SpeciesCandidate {
    SpeciesCandidate {
        species: species.to_string(),
        common_name: common_name.to_string(),
        confidence,
    }
}

fn dna_match(species: &str, common_name: &str, similarity: f64) -> DnaMatch {
    DnaMatch {
        species: species.to_string(),
        common_name: common_name.to_string(),
        similarity,
    }
}

fn family(name: &str, species: &[&str]) -> FamilyNode {
    FamilyNode {
        family: name.to_string(),
        species: species.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dna_matches_are_ranked_by_similarity() {
        let matcher = FixtureDnaMatcher::new(Duration::ZERO);
        let matches = matcher.match_sequence("ATCGGCTA").await.unwrap();

        assert!(!matches.is_empty());
        assert!(matches
            .windows(2)
            .all(|pair| pair[0].similarity >= pair[1].similarity));
        assert_eq!(matches[0].species, "Thunnus thynnus");
    }

    #[tokio::test]
    async fn blank_sequence_is_a_validation_error() {
        let matcher = FixtureDnaMatcher::new(Duration::ZERO);
        assert!(matches!(
            matcher.match_sequence("  ").await,
            Err(PortError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn species_prediction_needs_image_bytes() {
        let classifier = FixtureSpeciesClassifier::new(Duration::ZERO);
        assert!(classifier.predict_species(&[]).await.is_err());

        let prediction = classifier.predict_species(b"\x89PNG").await.unwrap();
        assert_eq!(prediction.common_name, "Blue Rockfish");
        assert_eq!(prediction.alternates.len(), 2);
    }

    #[test]
    fn taxonomy_serializes_rank_keys() {
        let value = serde_json::to_value(taxonomy_tree()).unwrap();
        let family = &value["children"][0]["children"][0]["children"][0]["children"][0];
        assert_eq!(value["kingdom"], "Animalia");
        assert_eq!(family["family"], "Scombridae");
        assert_eq!(family["species"][1], "Katsuwonus pelamis");
    }
}
