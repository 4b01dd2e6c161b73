/// Contacts on the cartridge chip and where they go on a Raspberry Pi header
pub const WIRING: &str = r"
Toner cartridge:

+--------------------------------------------------------+
|       / \                                 .            |
|       \ /               +---------------+            O +
|                         | [D]  [G]  [C] |             /
+------------------------------------------------------+

       D = Data    <connect-to>  raspberry pin 3
       G = Ground  <connect-to>  raspberry pin 6
       C = Clock   <connect-to>  raspberry pin 5
";
