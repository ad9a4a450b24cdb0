//! Compiled-in influencer catalog with case-insensitive substring lookup.

use shared::domain::Influencer;
use tracing::warn;

pub struct CatalogStore {
    influencers: Vec<Influencer>,
}

impl CatalogStore {
    /// Entries without any outfit are unusable for drop generation and are
    /// skipped at load time.
    pub fn new(influencers: Vec<Influencer>) -> Self {
        let influencers = influencers
            .into_iter()
            .filter(|influencer| {
                if influencer.outfits.is_empty() {
                    warn!(influencer = %influencer.id, "catalog: skipping entry with no outfits");
                    return false;
                }
                true
            })
            .collect();
        Self { influencers }
    }

    pub fn with_default_roster() -> Self {
        Self::new(default_roster())
    }

    /// Case-insensitive substring match on name and description. Catalog
    /// order is preserved; an empty query returns the full catalog.
    pub fn filter(&self, query: &str) -> Vec<&Influencer> {
        let needle = query.trim().to_lowercase();
        self.influencers
            .iter()
            .filter(|influencer| {
                needle.is_empty()
                    || influencer.name.to_lowercase().contains(&needle)
                    || influencer.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Influencer> {
        self.influencers.iter().find(|influencer| influencer.id == id)
    }

    pub fn len(&self) -> usize {
        self.influencers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.influencers.is_empty()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_default_roster()
    }
}

fn influencer(
    id: &str,
    name: &str,
    description: &str,
    avatar_uri: &str,
    outfits: &[&str],
) -> Influencer {
    Influencer {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        avatar_uri: avatar_uri.to_string(),
        outfits: outfits.iter().map(|uri| uri.to_string()).collect(),
    }
}

fn default_roster() -> Vec<Influencer> {
    vec![
        influencer(
            "zaara",
            "Zaara",
            "AI couture muse dropping one-of-one generated fits",
            "https://gateway.pinata.cloud/ipfs/bafybeib7apvwnakha5wis6yqh6o4uim2xbp6fwqszseqagyrtetslppeoy",
            &[
                "https://gateway.pinata.cloud/ipfs/bafybeib7apvwnakha5wis6yqh6o4uim2xbp6fwqszseqagyrtetslppeoy",
                "https://gateway.pinata.cloud/ipfs/bafybeic5izleelncfnz76wcqcuc7tyuv4mdduspcxzfucms4hnurcguafu",
                "https://gateway.pinata.cloud/ipfs/bafybeia5jga4u2dfe5fcplshpzrlwcaqnmbbc76ec2bvfbbssytcadp75y",
                "https://gateway.pinata.cloud/ipfs/bafybeih54oijwpop5mcu2skwonv2eq45qzgfrjfjqvkv3bit3lclr52liu",
                "https://gateway.pinata.cloud/ipfs/bafybeie7elxzgccb6nyxbajdemduaqaqpwhjqya45fxqxmp7c5vhzswkry",
                "https://gateway.pinata.cloud/ipfs/bafybeidoe2b3wwnk2geyemexyw2oexsnalq47xbjf5uw6ezfk75mraiilm",
                "https://gateway.pinata.cloud/ipfs/bafybeidlicbhvhzlacvmas5ddsgqyqplhoo6mmooeunafvboamtbs3ggsa",
                "https://gateway.pinata.cloud/ipfs/bafybeiaovpznfolrtyltyg4k5xnceuqpu5rikijn7wo26opzdq26lxu2dq",
            ],
        ),
        influencer(
            "nova",
            "Nova Renn",
            "Streetwear futurist curating neon techwear capsules",
            "https://gateway.pinata.cloud/ipfs/bafybeignova0avatar000000000000000000000000000000000000000",
            &[
                "https://gateway.pinata.cloud/ipfs/bafybeignovafit01000000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeignovafit02000000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeignovafit03000000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeignovafit04000000000000000000000000000000000000000000",
            ],
        ),
        influencer(
            "kairo",
            "Kairo Vale",
            "Minimalist tailoring with generative pattern accents",
            "https://gateway.pinata.cloud/ipfs/bafybeigkairoavatar00000000000000000000000000000000000000000",
            &[
                "https://gateway.pinata.cloud/ipfs/bafybeigkairofit0100000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigkairofit0200000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigkairofit0300000000000000000000000000000000000000000",
            ],
        ),
        influencer(
            "mirela",
            "Mirela Oru",
            "Vintage silhouettes reimagined by a diffusion stylist",
            "https://gateway.pinata.cloud/ipfs/bafybeigmirelaavatar0000000000000000000000000000000000000000",
            &[
                "https://gateway.pinata.cloud/ipfs/bafybeigmirelafit010000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigmirelafit020000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigmirelafit030000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigmirelafit040000000000000000000000000000000000000000",
                "https://gateway.pinata.cloud/ipfs/bafybeigmirelafit050000000000000000000000000000000000000000",
            ],
        ),
    ]
}
