//! Static example payloads surfaced in the generated API documentation.

pub const ALCHEMIST_SUMMARY: &str = "\"The Alchemist,\" written by Paulo Coelho, follows the journey of Santiago, a young shepherd from Spain who dreams of discovering a treasure hidden near the Egyptian pyramids. Inspired by a recurring dream, he seeks guidance from an enigmatic king, Melchizedek, who encourages him to pursue his \"Personal Legend,\" or true purpose in life. \n\nThroughout his journey, Santiago encounters various characters, including a crystal merchant, an Englishman, and an Alchemist, each imparting wisdom and lessons about life, love, and the importance of listening to one’s heart. As he travels through the desert, Santiago learns that the real treasure lies not just in material wealth but in self-discovery, spiritual growth, and the interconnectedness of all things. \n\nThe novel emphasizes the idea that when one is determined to pursue their dreams and follow their true path, the universe conspires to help them achieve it. Ultimately, Santiago’s journey teaches readers about the significance of dreams, the transformative power of love, and the courage to follow one's intuition.";
