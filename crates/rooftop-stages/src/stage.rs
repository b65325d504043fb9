//! Construction stage identifiers and the static stage catalog.
//!
//! Each [`Stage`] variant names one phase of the construction narrative.
//! [`Stage::Original`] is a sentinel meaning "the uploaded base image,
//! unmodified" and has no catalog entry; the four remaining stages each
//! carry a [`StageConfig`] with the prompt sent to the image model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a construction stage in the timeline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// The uploaded base image, shown as-is.
    #[default]
    Original,
    /// Raw concrete slab, pillars and rebar.
    Foundation,
    /// Ceramic block walls and fresh plaster.
    Masonry,
    /// Paint, glazing and electrical work.
    Finishing,
    /// Final photoreal render of the finished rooftop.
    Completed,
}

impl Stage {
    /// All stages in narrative order, starting with the sentinel.
    pub const ALL: [Self; 5] = [
        Self::Original,
        Self::Foundation,
        Self::Masonry,
        Self::Finishing,
        Self::Completed,
    ];

    /// Lowercase identifier used in download filenames and on the
    /// command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Foundation => "foundation",
            Self::Masonry => "masonry",
            Self::Finishing => "finishing",
            Self::Completed => "completed",
        }
    }

    /// Parse a stage from its [`slug`](Self::slug), ignoring ASCII case.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.slug().eq_ignore_ascii_case(slug))
    }

    /// Catalog entry for this stage, or `None` for [`Stage::Original`].
    #[must_use]
    pub fn config(self) -> Option<&'static StageConfig> {
        CATALOG.iter().find(|config| config.id == self)
    }

    /// Whether the image model can be asked to render this stage.
    #[must_use]
    pub const fn is_generatable(self) -> bool {
        !matches!(self, Self::Original)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Icon shown next to a stage in the timeline.
///
/// Kept abstract here so the UI crate can map each variant onto whatever
/// icon set it ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageIcon {
    /// Trowel and bricks.
    Bricks,
    /// Hammer.
    Hammer,
    /// Paint roller.
    PaintRoller,
    /// House with a check mark.
    HouseCheck,
}

/// Static description of one generatable stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageConfig {
    /// Which stage this entry describes.
    pub id: Stage,
    /// Timeline heading.
    pub title: &'static str,
    /// One-line summary under the heading.
    pub description: &'static str,
    /// Instruction sent to the image model along with the base image.
    pub prompt: &'static str,
    /// Timeline icon.
    pub icon: StageIcon,
}

/// The ordered stage catalog.
#[must_use]
pub const fn catalog() -> &'static [StageConfig] {
    &CATALOG
}

/// Badge text shown while the base image itself is displayed.
pub const ORIGINAL_TITLE: &str = "Esboço Original";

const CATALOG: [StageConfig; 4] = [
    StageConfig {
        id: Stage::Foundation,
        title: "Etapa 1: Fundação e Estrutura",
        description: "Concreto aparente, armações e clima de canteiro ativo.",
        prompt: "Renderize este projeto de rooftop mostrando a fase de fundação e estrutura. \
                 A laje e os pilares devem estar em concreto aparente, sem reboco, com armações \
                 metálicas e escoras de madeira. O fundo deve ter o pôr do sol e árvores. \
                 Adicione poeira e materiais de obra espalhados, transmitindo o clima de um \
                 canteiro de obras ativo. Estilo: realistic construction site lighting, raw \
                 concrete textures, cinematic realism.",
        icon: StageIcon::Bricks,
    },
    StageConfig {
        id: Stage::Masonry,
        title: "Etapa 2: Alvenaria e Revestimentos",
        description: "Blocos cerâmicos, reboco fresco e operários.",
        prompt: "Mostre este rooftop na fase de levantamento das paredes e aplicação de \
                 revestimentos. Paredes em bloco cerâmico aparente, partes com reboco fresco \
                 cinza, piso em preparação e o telhado sendo montado. Inclua operários \
                 trabalhando, andaimes e ferramentas espalhadas. Iluminação de sol poente \
                 quente. Estilo: realistic building progress, detailed textures, warm sunlight.",
        icon: StageIcon::Hammer,
    },
    StageConfig {
        id: Stage::Finishing,
        title: "Etapa 3: Acabamento e Instalações",
        description: "Pintura, vidros e detalhes de elétrica.",
        prompt: "Represente a fase de acabamento final deste rooftop: pintura das paredes em \
                 off-white acetinado, instalação dos vidros, madeira sendo envernizada, elétrica \
                 e iluminação em execução. Adicione andaimes leves, baldes de tinta e \
                 ferramentas de acabamento. Estilo: hyper-realistic render, warm tone lighting, \
                 construction detail.",
        icon: StageIcon::PaintRoller,
    },
    StageConfig {
        id: Stage::Completed,
        title: "Etapa 4: Obra Concluída",
        description: "Render final hiper-realista com acabamento premium.",
        prompt: "Transforme esta imagem em um render hiper-realista impecável ao pôr do sol. \
                 Texturas detalhadas, iluminação suave e natural, reflexos realistas nos vidros \
                 e metal, acabamento impecável na madeira. Piso de cimento queimado polido, \
                 guarda-corpo de vidro laminado com estrutura metálica preta, paredes com \
                 pintura off-white acetinada. Adicione plantas tropicais realistas, luminárias \
                 LED embutidas, reflexo solar nas janelas e céu alaranjado com nuvens suaves. \
                 Câmera em ângulo levemente inferior. Estilo: Ultra-realistic render, cinematic \
                 lighting, depth of field, 8K resolution, global illumination, photoreal \
                 textures, physically based rendering.",
        icon: StageIcon::HouseCheck,
    },
];
